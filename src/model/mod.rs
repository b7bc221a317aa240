//! Logic table assembly

mod assembler;
mod notice;
mod rows;

pub use assembler::{
    assemble, expand_elements, is_reportable, AssembleOptions, Assembly, MDRM_LENGTH, ORPHAN_LINE,
};
pub use notice::ExtractionNotice;
pub use rows::{ExtractedRow, FactColumns, LogicRow, LogicTable, BATCH_COLUMNS, COLUMNS};
