//! Resolve the fields referenced by a piece of element logic

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `alias.field` reference; captures the field only
static QUALIFIED_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\.(\b[a-zA-Z_]\w*)").unwrap());

/// Distinct field names referenced in `logic`, in order of first use.
///
/// `a.balance > 0 AND b.flag = 'Y'` resolves to `["balance", "flag"]`.
/// Unqualified identifiers and numeric literals never match.
pub fn resolve_elements(logic: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    QUALIFIED_FIELD_RE
        .captures_iter(logic)
        .filter_map(|caps| caps.get(1))
        .map(|field| field.as_str())
        .filter(|field| seen.insert(*field))
        .map(str::to_string)
        .collect()
}
