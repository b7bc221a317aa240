//! Assemble parsed statements into the final logic table

use crate::parser::{resolve_elements, ParsedStatement};

use super::notice::ExtractionNotice;
use super::rows::{ExtractedRow, FactColumns, LogicRow};

/// Valid MDRM codes are exactly this many characters long
pub const MDRM_LENGTH: usize = 8;

/// Line-number sentinel Axiom uses for cells not attached to a report line
pub const ORPHAN_LINE: &str = "z_orphans";

/// Options for turning parsed statements into rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Unaligned cells tolerated per file before an alignment notice is raised
    pub alignment_threshold: usize,
    /// Keep rows whose element logic references no qualified field
    pub keep_rows_without_elements: bool,
}

/// Result of assembling one file's statements
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub rows: Vec<LogicRow>,
    /// Rows before the MDRM filter
    pub candidate_rows: usize,
    /// Rows that passed the MDRM filter
    pub reportable_rows: usize,
    pub notices: Vec<ExtractionNotice>,
}

/// Whether a row names a real report cell.
pub fn is_reportable(row: &ExtractedRow) -> bool {
    let mdrm_ok = row
        .mdrm
        .as_deref()
        .is_some_and(|mdrm| mdrm.chars().count() == MDRM_LENGTH);
    mdrm_ok && row.line_number.as_deref() != Some(ORPHAN_LINE)
}

/// One output row per field referenced by the row's element logic.
pub fn expand_elements(row: &ExtractedRow, keep_without_elements: bool) -> Vec<LogicRow> {
    let elements = row
        .element_logic
        .as_deref()
        .map(resolve_elements)
        .unwrap_or_default();

    if elements.is_empty() {
        return if keep_without_elements {
            vec![LogicRow::from_extracted(row, None)]
        } else {
            Vec::new()
        };
    }

    elements
        .into_iter()
        .map(|element| LogicRow::from_extracted(row, Some(element)))
        .collect()
}

/// Build the output rows for one file's statements.
pub fn assemble(statements: &[ParsedStatement], options: &AssembleOptions) -> Assembly {
    let mut notices = Vec::new();
    if statements.is_empty() {
        notices.push(ExtractionNotice::NoStatements);
        return Assembly {
            notices,
            ..Default::default()
        };
    }

    let unaligned_cells: usize = statements.iter().map(|s| s.unaligned_cells).sum();
    if unaligned_cells > options.alignment_threshold {
        notices.push(ExtractionNotice::AlignmentAmbiguity {
            unaligned_cells,
            threshold: options.alignment_threshold,
        });
    }

    let columns = FactColumns::from_statements(statements);
    debug_assert!(columns.is_aligned());
    let extracted = columns.into_rows();
    let candidate_rows = extracted.len();

    let reportable: Vec<&ExtractedRow> = extracted.iter().filter(|row| is_reportable(row)).collect();
    let reportable_rows = reportable.len();

    let rows: Vec<LogicRow> = reportable
        .into_iter()
        .flat_map(|row| expand_elements(row, options.keep_rows_without_elements))
        .collect();

    if rows.is_empty() {
        notices.push(ExtractionNotice::NoReportableRows {
            candidates: candidate_rows,
        });
    }

    Assembly {
        rows,
        candidate_rows,
        reportable_rows,
        notices,
    }
}
