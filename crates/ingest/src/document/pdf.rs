use tracing::warn;

use super::{ExtractionError, PageContent};

/// Form feed: pdf-extract emits one between pages.
const PAGE_BREAK: char = '\x0C';

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let pages = split_pages(&text);
    if pages.is_empty() {
        // Scanned/image PDF. The validator reports the empty text as
        // insufficient content.
        warn!(bytes = bytes.len(), "pdf has no extractable text");
    }
    Ok(pages)
}

/// Non-blank pages, numbered by their position in the document.
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split(PAGE_BREAK)
        .enumerate()
        .map(|(i, page)| (i + 1, page.trim()))
        .filter(|(_, page)| !page.is_empty())
        .map(|(page_number, page)| PageContent {
            page_number,
            text: page.to_string(),
        })
        .collect()
}
