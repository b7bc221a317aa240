//! Reverse-engineer report lines, MDRM codes and derivation logic from one
//! flattened Axiom INSERT statement.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::clause::{
    after_first, before_first, before_not_exists, before_on, count, first_clause,
    or_not_available, ClauseSplit, AXIOM_DATA, CASE, DISTINCT, FROM, JOIN, NOT_AVAILABLE,
    NOT_EXISTS, SELECT, THEN, WHEN, WHERE,
};

/// Slash-delimited report annotation such as `/RCFA/RCFA3792/`
static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/[^()]*/").unwrap());

/// Optimizer hints (`/*+ APPEND */`) look like annotations but never are
static HINT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*\+[^*]*\*/").unwrap());

/// Report line number and MDRM code read from one annotation token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRef {
    pub line_number: String,
    pub mdrm: String,
}

impl ReportRef {
    pub fn new(line_number: impl Into<String>, mdrm: impl Into<String>) -> Self {
        Self {
            line_number: line_number.into(),
            mdrm: mdrm.into(),
        }
    }

    pub fn not_available() -> Self {
        Self::new(NOT_AVAILABLE, NOT_AVAILABLE)
    }

    /// Apply the positional rule to a `/.../` token.
    ///
    /// Two non-empty parts read as `/line/mdrm/`; more than two read as
    /// `/prefix/line/mdrm/...`. Anything else is not an annotation.
    pub fn from_token(token: &str) -> Self {
        let parts: Vec<&str> = token.split('/').collect();
        let non_empty = parts.iter().filter(|part| !part.is_empty()).count();
        let (line_idx, mdrm_idx) = match non_empty {
            2 => (1, 2),
            n if n > 2 => (2, 3),
            _ => return Self::not_available(),
        };
        match (parts.get(line_idx), parts.get(mdrm_idx)) {
            (Some(line), Some(mdrm)) => Self::new(*line, *mdrm),
            _ => Self::not_available(),
        }
    }
}

/// One CASE branch (or the whole statement when there is no CASE) with
/// every fact aligned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    /// 0-based branch position inside the statement
    pub branch: usize,
    pub line_number: Option<String>,
    pub mdrm: Option<String>,
    pub element_logic: Option<String>,
    pub upstream_logic: Option<String>,
    pub model: Option<String>,
}

/// Per-clause extraction results before alignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseFacts {
    pub report_refs: Vec<ReportRef>,
    pub element_logic: Vec<String>,
    pub upstream_logic: Vec<String>,
    pub models: Vec<String>,
}

/// A statement after clause parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    pub branches: Vec<BranchRecord>,
    /// Cells left empty because a clause produced neither one value nor
    /// one value per branch
    pub unaligned_cells: usize,
}

/// Parse one flattened statement into aligned branch records.
pub fn parse_statement(text: &str) -> ParsedStatement {
    align(extract_clause_facts(text))
}

/// Run the four extraction passes over `text`.
pub fn extract_clause_facts(text: &str) -> ClauseFacts {
    let when_count = count(text, WHEN);
    ClauseFacts {
        report_refs: report_refs(text),
        element_logic: element_logic(text),
        upstream_logic: upstream_logic(text, when_count),
        models: models(text),
    }
}

/// Report line / MDRM pairs, one per searched segment.
///
/// Statements containing `DISTINCT` are lookups, not report cells, and
/// yield nothing.
pub fn report_refs(text: &str) -> Vec<ReportRef> {
    if text.contains(DISTINCT) {
        return Vec::new();
    }

    let text = strip_hints(text);
    let split = choose_split(&text);
    let refs: Vec<ReportRef> = split
        .segments(&text)
        .into_iter()
        .map(|segment| match ANNOTATION_RE.find(segment) {
            Some(token) => ReportRef::from_token(token.as_str()),
            None => ReportRef::not_available(),
        })
        .collect();

    if refs.is_empty() {
        vec![ReportRef::not_available()]
    } else {
        refs
    }
}

fn strip_hints(text: &str) -> Cow<'_, str> {
    HINT_RE.replace_all(text, " ")
}

/// Pick the segment layout for the annotation search.
///
/// The before/after-`CASE` decision looks only at the projection (text
/// after the first `SELECT`), so the slash of the `INSERT /` marker is
/// never mistaken for an annotation.
pub fn choose_split(text: &str) -> ClauseSplit {
    if !text.contains(CASE) {
        return if text.contains(NOT_EXISTS) {
            ClauseSplit::SelectFromNotExists
        } else {
            ClauseSplit::SelectFrom
        };
    }

    let projection = after_first(text, SELECT).unwrap_or(text);
    let annotation_first = match (ANNOTATION_RE.find(projection), projection.find(CASE)) {
        (Some(token), Some(case_at)) => token.start() < case_at,
        (Some(_), None) => true,
        (None, _) => false,
    };

    if annotation_first {
        ClauseSplit::SelectCase
    } else {
        ClauseSplit::ThenWhen
    }
}

/// Condition text of every `WHEN` branch.
pub fn element_logic(text: &str) -> Vec<String> {
    if !text.contains(WHEN) {
        return vec![NOT_AVAILABLE.to_string()];
    }
    text.split(WHEN)
        .skip(1)
        .map(|branch| or_not_available(before_first(branch, THEN)))
        .collect()
}

/// WHERE-clause filter feeding the statement.
///
/// With `WHEN` branches the single filter is repeated once per branch.
pub fn upstream_logic(text: &str, when_count: usize) -> Vec<String> {
    if when_count > 0 {
        let filter = first_clause(text, WHERE)
            .map(or_not_available)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        return vec![filter; when_count];
    }

    let scope = before_not_exists(text);
    vec![first_clause(scope, WHERE)
        .map(or_not_available)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())]
}

/// Source tables, one combined string per `FROM` segment.
pub fn models(text: &str) -> Vec<String> {
    let scope = before_not_exists(text);
    let from_segments: Vec<&str> = scope.split(FROM).skip(1).collect();
    if from_segments.is_empty() {
        return vec![NOT_AVAILABLE.to_string()];
    }

    if scope.contains(JOIN) {
        joined_models(&from_segments)
    } else {
        from_segments
            .iter()
            .map(|segment| or_not_available(before_first(segment, WHERE)))
            .collect()
    }
}

/// Combine base and joined tables.
///
/// Each FROM segment contributes as many table fragments to its model as
/// it mentions `AXIOM_DATA`; fragments are consumed in order across
/// segments.
fn joined_models(from_segments: &[&str]) -> Vec<String> {
    let mut group_sizes = Vec::with_capacity(from_segments.len());
    let mut fragments: Vec<&str> = Vec::new();

    for segment in from_segments {
        group_sizes.push(count(segment, AXIOM_DATA));
        let mut parts = segment.split(JOIN);
        if let Some(base) = parts.next() {
            fragments.push(before_first(base, WHERE).trim());
        }
        for joined in parts {
            fragments.push(before_on(joined).trim());
        }
    }

    let mut start = 0;
    group_sizes
        .into_iter()
        .map(|size| {
            let end = (start + size).min(fragments.len());
            let group = &fragments[start.min(end)..end];
            start = end;
            let combined = group
                .iter()
                .filter(|fragment| !fragment.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            or_not_available(&combined)
        })
        .collect()
}

/// Turn per-clause lists into branch records.
///
/// A clause with a single value applies to every branch; a clause with one
/// value per branch maps positionally. Any other shape maps positionally
/// and leaves the remaining cells empty.
pub fn align(facts: ClauseFacts) -> ParsedStatement {
    let branch_count = [
        facts.report_refs.len(),
        facts.element_logic.len(),
        facts.upstream_logic.len(),
        facts.models.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
    .max(1);

    let mut unaligned_cells = 0;
    let (line_numbers, mdrms): (Vec<String>, Vec<String>) = facts
        .report_refs
        .into_iter()
        .map(|r| (r.line_number, r.mdrm))
        .unzip();

    let line_numbers = spread(line_numbers, branch_count, &mut unaligned_cells);
    let mdrms = spread(mdrms, branch_count, &mut 0);
    let element_logic = spread(facts.element_logic, branch_count, &mut unaligned_cells);
    let upstream_logic = spread(facts.upstream_logic, branch_count, &mut unaligned_cells);
    let models = spread(facts.models, branch_count, &mut unaligned_cells);

    let branches = line_numbers
        .into_iter()
        .zip(mdrms)
        .zip(element_logic)
        .zip(upstream_logic)
        .zip(models)
        .enumerate()
        .map(
            |(branch, ((((line_number, mdrm), element_logic), upstream_logic), model))| {
                BranchRecord {
                    branch,
                    line_number,
                    mdrm,
                    element_logic,
                    upstream_logic,
                    model,
                }
            },
        )
        .collect();

    ParsedStatement {
        branches,
        unaligned_cells,
    }
}

fn spread(values: Vec<String>, branch_count: usize, unaligned: &mut usize) -> Vec<Option<String>> {
    match values.len() {
        0 => vec![None; branch_count],
        1 => {
            let value = values.into_iter().next();
            vec![value; branch_count]
        }
        n => {
            if n < branch_count {
                *unaligned += branch_count - n;
            }
            let mut cells: Vec<Option<String>> = values.into_iter().map(Some).collect();
            cells.resize(branch_count, None);
            cells
        }
    }
}
