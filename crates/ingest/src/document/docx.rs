//! DOCX text extraction.
//!
//! DOCX files are ZIP archives; the body lives in `word/document.xml`.
//! Body paragraphs are emitted in order, followed by table rows rendered as
//! `cell | cell | cell`.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExtractionError, PageContent};

pub fn extract_docx(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Docx(format!("cannot find word/document.xml: {e}")))?
        .read_to_string(&mut xml)?;

    let text = parse_document_xml(&xml)?;
    Ok(vec![PageContent {
        page_number: 1,
        text,
    }])
}

/// Walk `document.xml` and collect paragraph and table text.
fn parse_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut table_rows: Vec<String> = Vec::new();

    let mut current_paragraph = String::new();
    let mut current_cell = String::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut table_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => current_paragraph.clear(),
                b"w:tbl" => table_depth += 1,
                b"w:tr" if table_depth > 0 => current_row.clear(),
                b"w:tc" if table_depth > 0 => current_cell.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.name().as_ref(), b"w:tab" | b"w:br") {
                    current_paragraph.push(' ');
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let para = current_paragraph.trim();
                    if !para.is_empty() {
                        if table_depth > 0 {
                            if !current_cell.is_empty() {
                                current_cell.push(' ');
                            }
                            current_cell.push_str(para);
                        } else {
                            paragraphs.push(para.to_string());
                        }
                    }
                    current_paragraph.clear();
                }
                b"w:tc" if table_depth > 0 => {
                    current_row.push(current_cell.trim().to_string());
                    current_cell.clear();
                }
                b"w:tr" if table_depth > 0 => {
                    let row = current_row
                        .iter()
                        .filter(|cell| !cell.is_empty())
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(" | ");
                    if !row.is_empty() {
                        table_rows.push(row);
                    }
                    current_row.clear();
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                    current_paragraph.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    paragraphs.extend(table_rows);
    Ok(paragraphs.join("\n\n"))
}
