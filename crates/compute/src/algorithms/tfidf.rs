//! TF-IDF vectorizer over word n-grams.
//!
//! Terms are lowercased `\w\w+` tokens with stopwords removed before
//! n-grams are formed. Weights are raw term counts scaled by a smoothed
//! inverse document frequency, `ln((1 + n) / (1 + df)) + 1`, and each row
//! is L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorizeError {
    #[error("no documents to vectorize")]
    NoDocuments,
    #[error("empty vocabulary after stopword removal and document-frequency pruning")]
    EmptyVocabulary,
}

#[derive(Debug, Clone)]
pub struct TfidfConfig {
    /// Keep at most this many terms, ranked by corpus frequency.
    pub max_features: usize,
    /// Inclusive n-gram length range.
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum share of documents a term may appear in.
    pub max_df: f64,
    pub stopwords: HashSet<String>,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            ngram_range: (1, 3),
            min_df: 1,
            max_df: 0.95,
            stopwords: HashSet::new(),
        }
    }
}

/// Dense TF-IDF matrix: one row per document, one column per vocabulary term.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Terms in column order (sorted alphabetically).
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfMatrix {
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Split a document into lowercased terms for every n-gram length in range.
pub fn analyze(doc: &str, config: &TfidfConfig) -> Vec<String> {
    let lowered = doc.to_lowercase();
    let tokens: Vec<&str> = TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !config.stopwords.contains(*t))
        .collect();

    let (min_n, max_n) = config.ngram_range;
    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        if tokens.len() < n {
            break;
        }
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}

pub fn fit_transform(docs: &[&str], config: &TfidfConfig) -> Result<TfidfMatrix, VectorizeError> {
    if docs.is_empty() {
        return Err(VectorizeError::NoDocuments);
    }
    let n_docs = docs.len();

    let counts: Vec<HashMap<String, usize>> = docs
        .iter()
        .map(|doc| {
            let mut tf = HashMap::new();
            for term in analyze(doc, config) {
                *tf.entry(term).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    // Document frequency and total corpus frequency per term.
    let mut df: HashMap<&str, usize> = HashMap::new();
    let mut corpus_tf: HashMap<&str, usize> = HashMap::new();
    for tf in &counts {
        for (term, &count) in tf {
            *df.entry(term.as_str()).or_insert(0) += 1;
            *corpus_tf.entry(term.as_str()).or_insert(0) += count;
        }
    }

    let max_doc_count = config.max_df * n_docs as f64;
    let mut kept: Vec<&str> = df
        .iter()
        .filter(|&(_, &d)| d >= config.min_df && (d as f64) <= max_doc_count)
        .map(|(&term, _)| term)
        .collect();

    if kept.len() > config.max_features {
        kept.sort_by(|a, b| corpus_tf[b].cmp(&corpus_tf[a]).then_with(|| a.cmp(b)));
        kept.truncate(config.max_features);
    }
    if kept.is_empty() {
        return Err(VectorizeError::EmptyVocabulary);
    }
    kept.sort_unstable();

    let column: BTreeMap<&str, usize> = kept.iter().enumerate().map(|(i, &t)| (t, i)).collect();
    let idf: Vec<f64> = kept
        .iter()
        .map(|t| ((1.0 + n_docs as f64) / (1.0 + df[t] as f64)).ln() + 1.0)
        .collect();

    let rows = counts
        .iter()
        .map(|tf| {
            let mut row = vec![0.0; kept.len()];
            for (term, &count) in tf {
                if let Some(&j) = column.get(term.as_str()) {
                    row[j] = count as f64 * idf[j];
                }
            }
            l2_normalize(&mut row);
            row
        })
        .collect();

    Ok(TfidfMatrix {
        vocabulary: kept.into_iter().map(str::to_string).collect(),
        rows,
    })
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}
