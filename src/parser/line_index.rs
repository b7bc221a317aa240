//! Marker line indexing

use std::path::Path;

use crate::error::AxiomLogicError;
use crate::util::contains_with_case;

use super::log_reader::LogFile;

/// How a marker is matched against log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerQuery {
    /// Match the marker case-sensitively (default: ASCII case-insensitive)
    pub case_sensitive: bool,
    /// Stop after this many hits
    pub max_results: Option<usize>,
}

impl MarkerQuery {
    pub fn case_sensitive(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            max_results: None,
        }
    }
}

/// Return the ascending 1-based line numbers whose text contains `marker`.
///
/// The marker is a literal substring, never a pattern.
pub fn index_lines(lines: &[String], marker: &str, query: MarkerQuery) -> Vec<usize> {
    let limit = query.max_results.unwrap_or(usize::MAX);
    if limit == 0 {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if contains_with_case(line, marker, query.case_sensitive) {
            hits.push(idx + 1);
            if hits.len() >= limit {
                break;
            }
        }
    }
    hits
}

impl LogFile {
    /// Line numbers in this file containing `marker`.
    pub fn marker_lines(&self, marker: &str, query: MarkerQuery) -> Vec<usize> {
        index_lines(self.lines(), marker, query)
    }
}

/// Read `path` and index `marker` in one step.
pub fn find_marker_lines(
    path: &Path,
    marker: &str,
    query: MarkerQuery,
) -> Result<Vec<usize>, AxiomLogicError> {
    let log = LogFile::open(path)?;
    Ok(log.marker_lines(marker, query))
}
