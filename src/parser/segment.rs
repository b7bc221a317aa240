//! Locate SQL INSERT captures inside an Axiom log

use crate::util::starts_with_ci;

use super::line_index::MarkerQuery;
use super::log_reader::LogFile;
use super::ParseOptions;

/// Start marker of a captured INSERT statement
pub const STATEMENT_MARKER: &str = "SQL statement: INSERT /";

/// Start marker of a rewritten capture that supersedes earlier ones
pub const PATCHED_STATEMENT_MARKER: &str = "Patched SQL statement: INSERT /";

/// End-of-capture markers in order of preference; the first one present
/// anywhere in the file is used for every statement.
pub const BOUNDARY_MARKERS: [&str; 3] = ["WHERE", "JOIN", "FROM"];

/// One captured statement span `[start_line, end_line]` (1-based, inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSegment {
    pub start_line: usize,
    pub end_line: usize,
    /// Whether the span holds a `Patched SQL statement` line
    pub patched: bool,
    /// Cleaned, non-blank lines of the span
    pub lines: Vec<String>,
}

/// Pair every valid statement start with the first unused boundary at or
/// after it. Boundaries are consumed left to right, so one boundary line
/// never closes two statements.
pub fn locate_spans(log: &LogFile, case_sensitive: bool) -> Vec<(usize, usize)> {
    let query = MarkerQuery::case_sensitive(case_sensitive);

    let mut starts = log.marker_lines(STATEMENT_MARKER, query);
    if starts.is_empty() {
        return Vec::new();
    }

    let patched = log.marker_lines(PATCHED_STATEMENT_MARKER, query);
    if let Some(&last_patched) = patched.iter().max() {
        starts.retain(|&start| start <= last_patched);
    }

    let boundaries = BOUNDARY_MARKERS
        .iter()
        .map(|marker| log.marker_lines(marker, query))
        .find(|hits| !hits.is_empty())
        .unwrap_or_default();

    let mut cursor = boundaries.into_iter();
    let mut spans = Vec::with_capacity(starts.len());
    for start in starts {
        match cursor.by_ref().find(|&end| end >= start) {
            Some(end) => spans.push((start, end)),
            None => break,
        }
    }
    spans
}

/// Remove tab and line-break characters from a raw log line.
pub fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

fn is_patched_line(line: &str, case_sensitive: bool) -> bool {
    let line = line.trim_start();
    if case_sensitive {
        line.starts_with(PATCHED_STATEMENT_MARKER)
    } else {
        starts_with_ci(line, PATCHED_STATEMENT_MARKER)
    }
}

/// Extract every statement segment of `log`.
///
/// When at least one segment carries a patched capture, only patched
/// segments are returned.
pub fn extract_segments(log: &LogFile, options: &ParseOptions) -> Vec<StatementSegment> {
    let case_sensitive = options.case_sensitive_markers;

    let segments: Vec<StatementSegment> = locate_spans(log, case_sensitive)
        .into_iter()
        .map(|(start_line, end_line)| {
            let lines: Vec<String> = log
                .span(start_line, end_line)
                .iter()
                .map(|line| clean_line(line))
                .filter(|line| !line.trim().is_empty())
                .collect();
            let patched = lines
                .iter()
                .any(|line| is_patched_line(line, case_sensitive));
            StatementSegment {
                start_line,
                end_line,
                patched,
                lines,
            }
        })
        .collect();

    if segments.iter().any(|segment| segment.patched) {
        segments
            .into_iter()
            .filter(|segment| segment.patched)
            .collect()
    } else {
        segments
    }
}

/// The cleaned lines of all kept segments, in file order.
pub fn extract_logic_lines(log: &LogFile, options: &ParseOptions) -> Vec<String> {
    extract_segments(log, options)
        .into_iter()
        .flat_map(|segment| segment.lines)
        .collect()
}
