mod docx;
mod md;
mod pdf;
mod txt;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use txt::decode_text;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document formats the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Txt,
    Docx,
    Md,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Md => "md",
        }
    }

    /// Resolve a format from a bare extension (`"pdf"`, `".PDF"`) or a
    /// filename (`"notes.docx"`).
    pub fn from_hint(hint: &str) -> Result<Self, ExtractionError> {
        let ext = hint.rsplit('.').next().unwrap_or("").trim().to_lowercase();
        ext.parse()
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "txt" | "text" => Ok(Self::Txt),
            "docx" => Ok(Self::Docx),
            "md" | "markdown" => Ok(Self::Md),
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). For other formats, always 1.
    pub page_number: usize,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub format: DocumentFormat,
    /// Extracted pages with text.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated, pages separated by a blank line.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Extract raw (uncleaned) text from document bytes of a known format.
pub fn extract_text(
    bytes: &[u8],
    format: DocumentFormat,
) -> Result<ExtractedDocument, ExtractionError> {
    let pages = match format {
        DocumentFormat::Pdf => pdf::extract_pdf(bytes)?,
        DocumentFormat::Txt => txt::extract_txt(bytes),
        DocumentFormat::Docx => docx::extract_docx(bytes)?,
        DocumentFormat::Md => md::extract_md(bytes),
    };

    Ok(ExtractedDocument { format, pages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_filename_and_extension() {
        assert_eq!(DocumentFormat::from_hint("notes.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_hint(".docx").unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_hint("txt").unwrap(), DocumentFormat::Txt);
        assert_eq!(DocumentFormat::from_hint("README.markdown").unwrap(), DocumentFormat::Md);
    }

    #[test]
    fn unknown_format_is_typed_error() {
        let err = DocumentFormat::from_hint("slides.pptx").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref f) if f == "pptx"));
    }

    #[test]
    fn full_text_joins_pages_with_blank_line() {
        let doc = ExtractedDocument {
            format: DocumentFormat::Pdf,
            pages: vec![
                PageContent { page_number: 1, text: "um".into() },
                PageContent { page_number: 2, text: "dois".into() },
            ],
        };
        assert_eq!(doc.full_text(), "um\n\ndois");
        assert_eq!(doc.total_chars(), 6);
    }

    #[test]
    fn extract_txt_through_dispatch() {
        let doc = extract_text(b"Ola mundo", DocumentFormat::Txt).unwrap();
        assert_eq!(doc.format, DocumentFormat::Txt);
        assert_eq!(doc.full_text(), "Ola mundo");
    }

    #[test]
    fn corrupt_pdf_is_an_error() {
        let err = extract_text(b"definitely not a pdf", DocumentFormat::Pdf).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
