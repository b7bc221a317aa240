//! Keyword-based clause splitting shared by every extraction pass.
//!
//! Keywords are matched as case-sensitive literals, exactly as they appear
//! in Axiom-generated SQL. Nothing here understands SQL grammar.

use crate::util::find_word;

pub const SELECT: &str = "SELECT";
pub const CASE: &str = "CASE";
pub const WHEN: &str = "WHEN";
pub const THEN: &str = "THEN";
pub const FROM: &str = "FROM";
pub const JOIN: &str = "JOIN";
pub const WHERE: &str = "WHERE";
pub const ON: &str = "ON";
pub const DISTINCT: &str = "DISTINCT";
pub const NOT_EXISTS: &str = "NOT EXISTS";
pub const AXIOM_DATA: &str = "AXIOM_DATA";

/// Placeholder for a clause that could not be located
pub const NOT_AVAILABLE: &str = "N/A";

/// Which slices of a statement are searched for the report annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseSplit {
    /// After the first `SELECT`, before its first `CASE`
    SelectCase,
    /// Each `THEN` branch, up to the next `WHEN`
    ThenWhen,
    /// Each `SELECT`, up to its first `FROM`
    SelectFrom,
    /// Only the first `SELECT`, up to its first `FROM`
    SelectFromNotExists,
}

impl ClauseSplit {
    /// Slices of `text` selected by this split, in statement order.
    pub fn segments(self, text: &str) -> Vec<&str> {
        match self {
            ClauseSplit::SelectCase => after_first(text, SELECT)
                .map(|rest| before_first(rest, CASE))
                .into_iter()
                .collect(),
            ClauseSplit::ThenWhen => text
                .split(THEN)
                .skip(1)
                .map(|branch| before_first(branch, WHEN))
                .collect(),
            ClauseSplit::SelectFrom => text
                .split(SELECT)
                .skip(1)
                .map(|part| before_first(part, FROM))
                .collect(),
            ClauseSplit::SelectFromNotExists => after_first(text, SELECT)
                .map(|rest| before_first(rest, FROM))
                .into_iter()
                .collect(),
        }
    }
}

/// Text before the first `keyword`, or all of `text` when absent.
pub fn before_first<'a>(text: &'a str, keyword: &str) -> &'a str {
    match text.find(keyword) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Text after the first `keyword`.
pub fn after_first<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    text.find(keyword).map(|idx| &text[idx + keyword.len()..])
}

/// Text between the first and second `keyword` (or the end of `text`).
pub fn first_clause<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    after_first(text, keyword).map(|rest| before_first(rest, keyword))
}

/// The statement truncated at `NOT EXISTS`, so correlated sub-queries do
/// not leak into upstream and model extraction.
pub fn before_not_exists(text: &str) -> &str {
    before_first(text, NOT_EXISTS)
}

/// Table part of a join fragment: everything before its `ON` keyword.
pub fn before_on(fragment: &str) -> &str {
    match find_word(fragment, ON) {
        Some(idx) => &fragment[..idx],
        None => fragment,
    }
}

/// Number of non-overlapping occurrences of `keyword`.
pub fn count(text: &str, keyword: &str) -> usize {
    text.matches(keyword).count()
}

/// Trimmed text, or the `N/A` placeholder when nothing is left.
pub fn or_not_available(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}
