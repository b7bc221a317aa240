//! Axiom log parsing: marker indexing, statement segmentation, grouping
//! and clause extraction.

mod clause;
mod element;
mod grouper;
mod line_index;
mod log_reader;
mod segment;
mod statement_parser;

pub use clause::{ClauseSplit, NOT_AVAILABLE};
pub use element::resolve_elements;
pub use grouper::{group_statements, GROUPING_MARKER};
pub use line_index::{find_marker_lines, index_lines, MarkerQuery};
pub use log_reader::LogFile;
pub use segment::{
    clean_line, extract_logic_lines, extract_segments, locate_spans, StatementSegment,
    BOUNDARY_MARKERS, PATCHED_STATEMENT_MARKER, STATEMENT_MARKER,
};
pub use statement_parser::{
    align, choose_split, element_logic, extract_clause_facts, models, parse_statement,
    report_refs, upstream_logic, BranchRecord, ClauseFacts, ParsedStatement, ReportRef,
};

/// Marker matching options for log parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Match statement and boundary markers case-sensitively
    pub case_sensitive_markers: bool,
    /// Marker that starts a new logical statement when grouping lines
    pub statement_marker: String,
    /// Match `statement_marker` case-sensitively
    pub statement_marker_case_sensitive: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            case_sensitive_markers: false,
            statement_marker: GROUPING_MARKER.to_string(),
            statement_marker_case_sensitive: true,
        }
    }
}

/// Segment, group and clause-parse every statement in `log`.
pub fn parse_log(log: &LogFile, options: &ParseOptions) -> Vec<ParsedStatement> {
    let lines = extract_logic_lines(log, options);
    let statements = group_statements(
        &lines,
        &options.statement_marker,
        options.statement_marker_case_sensitive,
    );

    tracing::debug!(
        path = %log.path().display(),
        lines = lines.len(),
        statements = statements.len(),
        "grouped logic statements"
    );

    statements.iter().map(|text| parse_statement(text)).collect()
}
