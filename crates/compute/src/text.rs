//! Word-level text helpers shared by the segmenter and the classifier.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Portuguese function words ignored by keyword extraction and TF-IDF.
pub const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "até",
    "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos",
    "e", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "essa", "essas", "esse",
    "esses", "esta", "estas", "este", "estes", "eu", "foi", "foram", "há", "isso", "isto", "já",
    "lhe", "lhes", "lo", "mas", "me", "mesmo", "meu", "minha", "muito", "na", "não", "nas",
    "nem", "no", "nos", "nós", "nossa", "nossas", "nosso", "nossos", "num", "numa", "o", "os",
    "ou", "para", "pela", "pelas", "pelo", "pelos", "por", "qual", "quando", "que", "quem",
    "são", "se", "sem", "seu", "seus", "só", "sua", "suas", "também", "te", "tem", "tinha",
    "tinham", "tu", "tua", "tuas", "tudo", "um", "uma", "umas", "uns", "você", "vocês", "vos",
];

const VOWELS: &str = "aáàâãeéèêiíïoóôõuúü";

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-záàâãéèêíïóôõöúçñ]+\b").unwrap());
static KEYWORD_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-záàâãéèêíïóôõöúçñ]{4,}\b").unwrap());
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

pub fn stopword_set() -> HashSet<String> {
    PORTUGUESE_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

/// Lowercased alphabetic words (Portuguese letters only).
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Non-empty segments after splitting on runs of `.`, `!` and `?`.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Vowel-group count: a syllable starts at every vowel that follows a
/// non-vowel. Never less than one.
pub fn syllable_count(word: &str) -> usize {
    let mut count = 0;
    let mut prev_is_vowel = false;
    for c in word.to_lowercase().chars() {
        let is_vowel = VOWELS.contains(c);
        if is_vowel && !prev_is_vowel {
            count += 1;
        }
        prev_is_vowel = is_vowel;
    }
    count.max(1)
}

/// Top five words of four or more letters by frequency, stopwords excluded.
/// Ties keep first-occurrence order.
pub fn simple_keywords(text: &str, stopwords: &HashSet<String>) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for m in KEYWORD_CANDIDATE.find_iter(&lowered) {
        let word = m.as_str();
        if stopwords.contains(word) {
            continue;
        }
        let count = freq.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-occurrence order among equal counts.
    order.sort_by(|a, b| freq[b].cmp(&freq[a]));
    order.into_iter().take(5).map(str::to_string).collect()
}

/// Upper-case the first letter of each space-separated word, lower-case the
/// rest.
pub fn title_case(term: &str) -> String {
    term.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
