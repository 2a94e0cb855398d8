//! Text normalizer: extraction by declared format followed by boilerplate
//! cleanup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use questgen_core::config::IngestConfig;
use regex::Regex;
use tracing::info;

use crate::document::{extract_text, DocumentFormat, ExtractionError};

/// Lines shorter than this (in characters, after trimming) are candidates
/// for header/footer suppression.
const BOILERPLATE_MAX_CHARS: usize = 50;
/// A short line seen more often than this is treated as a header/footer.
const BOILERPLATE_MAX_REPEATS: usize = 3;

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static PAGE_NUMBER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\d+|(?:page|p[áa]gina)\s+\d+)\s*$").unwrap()
});

#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Formats accepted by [`Normalizer::normalize`]; anything else is an
    /// `UnsupportedFormat` error even if an extractor exists for it.
    pub allowed_formats: Vec<DocumentFormat>,
    pub max_file_size_bytes: u64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self::from(&IngestConfig::default())
    }
}

impl From<&IngestConfig> for NormalizerConfig {
    /// Unknown extensions in the configured list are ignored.
    fn from(config: &IngestConfig) -> Self {
        Self {
            allowed_formats: config
                .allowed_extensions
                .iter()
                .filter_map(|ext| ext.parse().ok())
                .collect(),
            max_file_size_bytes: config.max_file_size_bytes(),
        }
    }
}

/// Turns document bytes into clean document text.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Resolve a format hint (extension or filename) against the allow-list.
    pub fn resolve_format(&self, format_hint: &str) -> Result<DocumentFormat, ExtractionError> {
        let format = DocumentFormat::from_hint(format_hint)?;
        if !self.config.allowed_formats.contains(&format) {
            return Err(ExtractionError::UnsupportedFormat(format.to_string()));
        }
        Ok(format)
    }

    /// Extract and clean text from document bytes of the declared format.
    pub fn normalize(&self, bytes: &[u8], format_hint: &str) -> Result<String, ExtractionError> {
        let format = self.resolve_format(format_hint)?;
        info!(format = %format, bytes = bytes.len(), "text extraction started");

        let extracted = extract_text(bytes, format)?;
        let raw = extracted.full_text();
        let cleaned = clean_text(&raw);

        info!(
            format = %format,
            pages = extracted.pages.len(),
            raw_length = extracted.total_chars(),
            cleaned_length = cleaned.chars().count(),
            "text extraction completed"
        );
        Ok(cleaned)
    }

    /// Read a local file and normalize it, inferring the format from its
    /// extension.
    pub fn normalize_file(&self, path: &Path) -> Result<String, ExtractionError> {
        let hint = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        // Reject before touching the disk.
        self.resolve_format(hint)?;

        let size = std::fs::metadata(path)?.len();
        if size > self.config.max_file_size_bytes {
            return Err(ExtractionError::FileTooLarge {
                size,
                max: self.config.max_file_size_bytes,
            });
        }

        let bytes = std::fs::read(path)?;
        self.normalize(&bytes, hint)
    }
}

/// Remove extraction artifacts from raw document text.
///
/// Steps, in order: collapse blank-line runs to a single blank line,
/// collapse repeated spaces, drop page-number lines, drop short lines
/// repeated more than three times (headers/footers), strip control
/// characters, trim. The pass is repeated until the text stops changing,
/// so `clean_text(clean_text(x)) == clean_text(x)`.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut current = clean_pass(&text.replace("\r\n", "\n").replace('\r', "\n"));
    // Every pass that changes the text makes it strictly shorter.
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    let text = BLANK_LINE_RUN.replace_all(text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = drop_page_numbers(&text);
    let text = drop_repeated_short_lines(&text);
    let text = strip_control_chars(&text);
    text.trim().to_string()
}

fn drop_page_numbers(text: &str) -> String {
    text.split('\n')
        .filter(|line| !PAGE_NUMBER_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two passes: count every short non-blank line, then filter.
///
/// Blank lines are paragraph separators, not boilerplate, and are never
/// counted.
fn drop_repeated_short_lines(text: &str) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in text.split('\n') {
        let stripped = line.trim();
        if is_boilerplate_candidate(stripped) {
            *counts.entry(stripped).or_default() += 1;
        }
    }

    text.split('\n')
        .filter(|line| {
            let stripped = line.trim();
            !is_boilerplate_candidate(stripped)
                || counts.get(stripped).copied().unwrap_or(0) <= BOILERPLATE_MAX_REPEATS
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_boilerplate_candidate(stripped: &str) -> bool {
    !stripped.is_empty() && stripped.chars().count() < BOILERPLATE_MAX_CHARS
}

fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}
