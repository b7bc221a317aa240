//! Non-fatal extraction diagnostics

use std::fmt;

/// Something worth telling the operator that did not stop extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionNotice {
    /// The file holds no `SQL statement: INSERT /` capture
    NoStatements,
    /// Statements were parsed but no row passed the MDRM filter
    NoReportableRows { candidates: usize },
    /// Clause counts disagreed and cells were left empty to keep rows aligned
    AlignmentAmbiguity {
        unaligned_cells: usize,
        threshold: usize,
    },
}

impl fmt::Display for ExtractionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionNotice::NoStatements => write!(f, "no SQL INSERT statements found"),
            ExtractionNotice::NoReportableRows { candidates } => write!(
                f,
                "none of {} extracted rows carries an 8-character MDRM with resolvable elements",
                candidates
            ),
            ExtractionNotice::AlignmentAmbiguity {
                unaligned_cells,
                threshold,
            } => write!(
                f,
                "{} cells could not be aligned to a branch (threshold {})",
                unaligned_cells, threshold
            ),
        }
    }
}
