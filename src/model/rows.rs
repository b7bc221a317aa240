//! Tabular representation of extracted logic

use crate::parser::ParsedStatement;

/// Output columns of a single-file extraction
pub const COLUMNS: [&str; 6] = [
    "LineNumber",
    "MDRM",
    "Element",
    "ElementLogic",
    "UpstreamLogic",
    "Model",
];

/// Columns prepended in batch mode
pub const BATCH_COLUMNS: [&str; 2] = ["Report", "Schedule"];

/// One aligned (line, MDRM, logic) row before element expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRow {
    pub line_number: Option<String>,
    pub mdrm: Option<String>,
    pub element_logic: Option<String>,
    pub upstream_logic: Option<String>,
    pub model: Option<String>,
}

/// One final output row: a single (MDRM, Element) pair with its logic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicRow {
    pub report: Option<String>,
    pub schedule: Option<String>,
    pub line_number: Option<String>,
    pub mdrm: Option<String>,
    pub element: Option<String>,
    pub element_logic: Option<String>,
    pub upstream_logic: Option<String>,
    pub model: Option<String>,
}

impl LogicRow {
    pub fn from_extracted(row: &ExtractedRow, element: Option<String>) -> Self {
        Self {
            report: None,
            schedule: None,
            line_number: row.line_number.clone(),
            mdrm: row.mdrm.clone(),
            element,
            element_logic: row.element_logic.clone(),
            upstream_logic: row.upstream_logic.clone(),
            model: row.model.clone(),
        }
    }

    /// Tag the row with its source report; the schedule is the first four
    /// characters of the line number.
    pub fn with_report(mut self, report: &str) -> Self {
        self.schedule = self
            .line_number
            .as_deref()
            .map(|line| line.chars().take(4).collect());
        self.report = Some(report.to_string());
        self
    }
}

/// The five fact lists of one extraction call.
///
/// Every list always has the same length once a statement has been pushed;
/// [`FactColumns::pad`] right-pads with `None` for callers that fill the
/// lists by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactColumns {
    pub line_number: Vec<Option<String>>,
    pub mdrm: Vec<Option<String>>,
    pub element_logic: Vec<Option<String>>,
    pub upstream_logic: Vec<Option<String>>,
    pub model: Vec<Option<String>>,
}

impl FactColumns {
    pub fn from_statements(statements: &[ParsedStatement]) -> Self {
        let mut columns = Self::default();
        for statement in statements {
            columns.push_statement(statement);
        }
        columns
    }

    pub fn push_statement(&mut self, statement: &ParsedStatement) {
        for record in &statement.branches {
            self.line_number.push(record.line_number.clone());
            self.mdrm.push(record.mdrm.clone());
            self.element_logic.push(record.element_logic.clone());
            self.upstream_logic.push(record.upstream_logic.clone());
            self.model.push(record.model.clone());
        }
    }

    pub fn lengths(&self) -> [usize; 5] {
        [
            self.line_number.len(),
            self.mdrm.len(),
            self.element_logic.len(),
            self.upstream_logic.len(),
            self.model.len(),
        ]
    }

    pub fn is_aligned(&self) -> bool {
        let lengths = self.lengths();
        lengths.iter().all(|&len| len == lengths[0])
    }

    /// Right-pad every list to the longest one. Returns the number of
    /// cells added.
    pub fn pad(&mut self) -> usize {
        let target = self.lengths().into_iter().max().unwrap_or(0);
        let mut added = 0;
        for column in [
            &mut self.line_number,
            &mut self.mdrm,
            &mut self.element_logic,
            &mut self.upstream_logic,
            &mut self.model,
        ] {
            added += target - column.len();
            column.resize(target, None);
        }
        added
    }

    pub fn into_rows(mut self) -> Vec<ExtractedRow> {
        self.pad();
        self.line_number
            .into_iter()
            .zip(self.mdrm)
            .zip(self.element_logic)
            .zip(self.upstream_logic)
            .zip(self.model)
            .map(
                |((((line_number, mdrm), element_logic), upstream_logic), model)| ExtractedRow {
                    line_number,
                    mdrm,
                    element_logic,
                    upstream_logic,
                    model,
                },
            )
            .collect()
    }
}

/// Final table handed to the workbook writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicTable {
    pub rows: Vec<LogicRow>,
    /// Emit the `Report` and `Schedule` columns
    pub batch_columns: bool,
}

impl LogicTable {
    pub fn new(rows: Vec<LogicRow>, batch_columns: bool) -> Self {
        Self {
            rows,
            batch_columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = Vec::with_capacity(BATCH_COLUMNS.len() + COLUMNS.len());
        if self.batch_columns {
            headers.extend(BATCH_COLUMNS);
        }
        headers.extend(COLUMNS);
        headers
    }

    /// Cell values of `row` in header order.
    pub fn values<'a>(&self, row: &'a LogicRow) -> Vec<Option<&'a str>> {
        let mut values = Vec::with_capacity(BATCH_COLUMNS.len() + COLUMNS.len());
        if self.batch_columns {
            values.push(row.report.as_deref());
            values.push(row.schedule.as_deref());
        }
        values.extend([
            row.line_number.as_deref(),
            row.mdrm.as_deref(),
            row.element.as_deref(),
            row.element_logic.as_deref(),
            row.upstream_logic.as_deref(),
            row.model.as_deref(),
        ]);
        values
    }
}
