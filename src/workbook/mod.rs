//! Excel workbook generation

mod packager;
mod parts;
mod sheet_xml;

pub use packager::create_workbook;
pub use sheet_xml::{column_letter, sanitize_cell_text, MAX_CELL_CHARS};

/// Name of the single worksheet in every generated workbook
pub const SHEET_NAME: &str = "Axiom Logic";
