use std::sync::LazyLock;

use regex::Regex;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// A run of consecutive paragraphs, the unit fed into clustering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub word_count: usize,
}

/// Greedy paragraph accumulation.
///
/// Paragraphs (blank-line separated, trimmed, empty ones skipped) are
/// appended to the current chunk; once its word count reaches `min_words`
/// the chunk is closed. A trailing chunk below the threshold is kept.
pub fn split_into_chunks(text: &str, min_words: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut paragraphs: Vec<&str> = Vec::new();
    let mut word_count = 0;

    for para in PARAGRAPH_BREAK.split(text).map(str::trim) {
        if para.is_empty() {
            continue;
        }
        paragraphs.push(para);
        word_count += para.split_whitespace().count();

        if word_count >= min_words {
            chunks.push(Chunk {
                text: paragraphs.join("\n\n"),
                word_count,
            });
            paragraphs.clear();
            word_count = 0;
        }
    }

    if !paragraphs.is_empty() {
        chunks.push(Chunk {
            text: paragraphs.join("\n\n"),
            word_count,
        });
    }

    chunks
}
