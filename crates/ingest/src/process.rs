use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::document::ExtractionError;
use crate::normalize::Normalizer;
use crate::validate::{ContentValidation, ContentValidator};

const PREVIEW_CHARS: usize = 500;
const CONTENT_HASH_HEX_CHARS: usize = 16;

/// A normalized document together with its sufficiency report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub text: String,
    /// First 16 hex chars of the SHA-256 of `text`.
    pub content_hash: String,
    pub validation: ContentValidation,
    pub preview: String,
}

/// Normalize document bytes, then validate and fingerprint the result.
pub fn process_document(
    bytes: &[u8],
    format_hint: &str,
    normalizer: &Normalizer,
    validator: &ContentValidator,
) -> Result<ProcessedDocument, ExtractionError> {
    let text = normalizer.normalize(bytes, format_hint)?;
    Ok(summarize(text, validator))
}

/// [`process_document`] for a local file; the format comes from the
/// extension and the size cap applies.
pub fn process_file(
    path: &Path,
    normalizer: &Normalizer,
    validator: &ContentValidator,
) -> Result<ProcessedDocument, ExtractionError> {
    let text = normalizer.normalize_file(path)?;
    Ok(summarize(text, validator))
}

fn summarize(text: String, validator: &ContentValidator) -> ProcessedDocument {
    let validation = validator.validate(&text);
    let content_hash = content_hash(&text);
    let preview = preview(&text);

    info!(
        content_hash = %content_hash,
        words = validation.word_count,
        language = %validation.language,
        sufficient = validation.is_sufficient,
        "document processed"
    );

    ProcessedDocument {
        text,
        content_hash,
        validation,
        preview,
    }
}

pub fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..CONTENT_HASH_HEX_CHARS].to_string()
}

/// First 500 characters, with `"..."` appended when the text was cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
