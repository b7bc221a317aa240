//! Generate xl/worksheets/sheet1.xml

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::LogicTable;

const MAIN_NAMESPACE: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Excel rejects cells longer than this
pub const MAX_CELL_CHARS: usize = 32_767;

/// Style index of the bold header font in styles.xml
const HEADER_STYLE: &str = "1";

/// Spreadsheet column name for a 0-based index (`0 -> A`, `26 -> AA`).
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Drop characters XML 1.0 cannot carry and cap the length at
/// [`MAX_CELL_CHARS`].
pub fn sanitize_cell_text(value: &str) -> Cow<'_, str> {
    let needs_work =
        value.chars().any(|c| !is_xml_char(c)) || value.chars().nth(MAX_CELL_CHARS).is_some();
    if !needs_work {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .filter(|&c| is_xml_char(c))
            .take(MAX_CELL_CHARS)
            .collect(),
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Write the worksheet: a bold header row followed by one row per
/// [`LogicRow`](crate::model::LogicRow). Empty cells are omitted.
pub(crate) fn generate_sheet_xml<W: Write>(writer: W, table: &LogicTable) -> anyhow::Result<()> {
    let mut xml_writer = Writer::new(writer);

    xml_writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        Some("yes"),
    )))?;

    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", MAIN_NAMESPACE));
    xml_writer.write_event(Event::Start(root))?;

    let headers = table.headers();
    let last_column = column_letter(headers.len().saturating_sub(1));
    let dimension = format!("A1:{}{}", last_column, table.rows.len() + 1);
    let dim = BytesStart::new("dimension").with_attributes([("ref", dimension.as_str())]);
    xml_writer.write_event(Event::Empty(dim))?;

    xml_writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let header_values: Vec<Option<&str>> = headers.iter().map(|h| Some(*h)).collect();
    write_row(&mut xml_writer, 1, &header_values, Some(HEADER_STYLE))?;

    for (idx, row) in table.rows.iter().enumerate() {
        write_row(&mut xml_writer, idx + 2, &table.values(row), None)?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml_writer.write_event(Event::End(BytesEnd::new("worksheet")))?;

    Ok(())
}

fn write_row<W: Write>(
    writer: &mut Writer<W>,
    row_number: usize,
    values: &[Option<&str>],
    style: Option<&str>,
) -> anyhow::Result<()> {
    let r = row_number.to_string();
    let row = BytesStart::new("row").with_attributes([("r", r.as_str())]);
    writer.write_event(Event::Start(row))?;

    for (col, value) in values.iter().enumerate() {
        if let Some(value) = value {
            let reference = format!("{}{}", column_letter(col), row_number);
            write_inline_string_cell(writer, &reference, value, style)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

/// `<c r=".." t="inlineStr"><is><t xml:space="preserve">..</t></is></c>`
fn write_inline_string_cell<W: Write>(
    writer: &mut Writer<W>,
    reference: &str,
    value: &str,
    style: Option<&str>,
) -> anyhow::Result<()> {
    let mut cell = BytesStart::new("c").with_attributes([("r", reference), ("t", "inlineStr")]);
    if let Some(style) = style {
        cell.push_attribute(("s", style));
    }
    writer.write_event(Event::Start(cell))?;
    writer.write_event(Event::Start(BytesStart::new("is")))?;

    let text = BytesStart::new("t").with_attributes([("xml:space", "preserve")]);
    writer.write_event(Event::Start(text))?;
    writer.write_event(Event::Text(BytesText::new(&sanitize_cell_text(value))))?;
    writer.write_event(Event::End(BytesEnd::new("t")))?;

    writer.write_event(Event::End(BytesEnd::new("is")))?;
    writer.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}
