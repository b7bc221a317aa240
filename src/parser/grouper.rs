//! Regroup cleaned log lines into logical SQL statements

use crate::util::contains_with_case;

/// Default grouping marker. Note the capital `S`: it differs from the
/// segmentation marker and is matched case-sensitively unless configured
/// otherwise.
pub const GROUPING_MARKER: &str = "SQL Statement: INSERT /";

/// Join `lines` into one string per statement.
///
/// A line containing `marker` starts a new statement whenever one is
/// already being accumulated. Lines inside a statement are joined with a
/// single space.
pub fn group_statements(lines: &[String], marker: &str, case_sensitive: bool) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        if !current.is_empty() && contains_with_case(line, marker, case_sensitive) {
            statements.push(current.join(" "));
            current.clear();
        }
        current.push(line);
    }

    if !current.is_empty() {
        statements.push(current.join(" "));
    }

    statements
}
