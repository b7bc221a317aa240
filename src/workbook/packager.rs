//! Create the .xlsx ZIP package

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::Result;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::AxiomLogicError;
use crate::model::LogicTable;

use super::{parts, sheet_xml, SHEET_NAME};

/// Write `table` as a single-sheet workbook at `output_path`.
///
/// Missing parent directories are created. An existing file is replaced.
pub fn create_workbook(table: &LogicTable, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AxiomLogicError::WorkbookWrite {
                path: output_path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let file = File::create(output_path).map_err(|e| AxiomLogicError::WorkbookWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(1));

    zip.start_file("[Content_Types].xml", options)
        .map_err(AxiomLogicError::from)?;
    zip.write_all(parts::CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)
        .map_err(AxiomLogicError::from)?;
    zip.write_all(parts::ROOT_RELS_XML.as_bytes())?;

    let workbook_bytes = render_part("xl/workbook.xml", 1024, |buffer| {
        parts::generate_workbook_xml(buffer, SHEET_NAME)
    })?;
    zip.start_file("xl/workbook.xml", options)
        .map_err(AxiomLogicError::from)?;
    zip.write_all(&workbook_bytes)?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)
        .map_err(AxiomLogicError::from)?;
    zip.write_all(parts::WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/styles.xml", options)
        .map_err(AxiomLogicError::from)?;
    zip.write_all(parts::STYLES_XML.as_bytes())?;

    // Roughly 150 bytes of markup per populated cell
    let cells = table.rows.len().saturating_add(1) * table.headers().len();
    let sheet_bytes = render_part("xl/worksheets/sheet1.xml", cells * 150, |buffer| {
        sheet_xml::generate_sheet_xml(buffer, table)
    })?;
    zip.start_file("xl/worksheets/sheet1.xml", options)
        .map_err(AxiomLogicError::from)?;
    zip.write_all(&sheet_bytes)?;

    zip.finish().map_err(AxiomLogicError::from)?;

    Ok(())
}

/// Generate one XML part into memory.
fn render_part<F>(part: &str, capacity: usize, generate: F) -> Result<Vec<u8>, AxiomLogicError>
where
    F: FnOnce(&mut Cursor<Vec<u8>>) -> Result<()>,
{
    let mut buffer = Cursor::new(Vec::with_capacity(capacity));
    generate(&mut buffer).map_err(|e| AxiomLogicError::XmlGeneration {
        message: format!("{part}: {e:#}"),
    })?;
    Ok(buffer.into_inner())
}
