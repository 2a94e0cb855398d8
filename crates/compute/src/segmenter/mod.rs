//! Topic segmentation: paragraph chunking, TF-IDF vectorization and seeded
//! K-Means clustering, with a single-segment fallback for short or
//! degenerate input.

mod chunk;
mod tests;

use std::collections::HashSet;

use questgen_core::config::AnalysisConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::algorithms::kmeans::{euclidean, kmeans_best_of, KmeansResult};
use crate::algorithms::tfidf::{fit_transform, TfidfConfig, TfidfMatrix};
use crate::text::{simple_keywords, stopword_set, title_case};

pub use chunk::{split_into_chunks, Chunk};

/// Name given to the segment produced without clustering.
pub const MAIN_CONTENT_TOPIC: &str = "Conteúdo Principal";
/// Name used when a cluster has no usable terms.
pub const GENERAL_TOPIC: &str = "Tópico Geral";

const CENTROID_TOP_TERMS: usize = 10;
const SEGMENT_KEYWORDS: usize = 5;
const TOPIC_NAME_TERMS: usize = 2;
/// Relevance reported for a cluster without members.
const EMPTY_CLUSTER_RELEVANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSegment {
    pub topic: String,
    pub content: String,
    pub keywords: Vec<String>,
    /// `1 / (1 + mean member distance to centroid)`, in (0, 1].
    pub relevance_score: f64,
}

/// Segment overview without the content body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic: String,
    pub keywords: Vec<String>,
    pub relevance_score: f64,
    pub word_count: usize,
}

impl From<&TopicSegment> for TopicSummary {
    fn from(segment: &TopicSegment) -> Self {
        Self {
            topic: segment.topic.clone(),
            keywords: segment.keywords.clone(),
            relevance_score: segment.relevance_score,
            word_count: segment.content.split_whitespace().count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub topic_count: usize,
    pub min_chunk_words: usize,
    pub tfidf: TfidfConfig,
    pub kmeans_seed: u64,
    pub kmeans_restarts: usize,
    pub kmeans_max_iterations: usize,
    /// Excluded from fallback keyword extraction.
    pub stopwords: HashSet<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for SegmenterConfig {
    fn from(config: &AnalysisConfig) -> Self {
        let stopwords = stopword_set();
        Self {
            topic_count: config.topic_count,
            min_chunk_words: config.min_chunk_words,
            tfidf: TfidfConfig {
                max_features: config.tfidf_max_features,
                ngram_range: (1, 3),
                min_df: config.tfidf_min_df,
                max_df: config.tfidf_max_df,
                stopwords: stopwords.clone(),
            },
            kmeans_seed: config.kmeans_seed,
            kmeans_restarts: config.kmeans_restarts,
            kmeans_max_iterations: config.kmeans_max_iterations,
            stopwords,
        }
    }
}

/// Splits document text into named topic segments.
///
/// Holds configuration only; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct TopicSegmenter {
    config: SegmenterConfig,
}

impl TopicSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn with_topic_count(topic_count: usize) -> Self {
        Self::new(SegmenterConfig {
            topic_count,
            ..SegmenterConfig::default()
        })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segments ordered by descending relevance.
    pub fn segment(&self, text: &str) -> Vec<TopicSegment> {
        let chunks = split_into_chunks(text, self.config.min_chunk_words);
        if chunks.len() < 2 {
            return vec![self.single_segment(text)];
        }

        let n_clusters = self.config.topic_count.clamp(1, chunks.len());
        info!(
            chunks = chunks.len(),
            target_topics = n_clusters,
            "topic segmentation started"
        );

        let docs: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let matrix = match fit_transform(&docs, &self.config.tfidf) {
            Ok(matrix) => matrix,
            Err(e) => {
                warn!(error = %e, "tfidf vectorization failed, using single segment");
                return vec![self.single_segment(text)];
            }
        };

        let clustering = kmeans_best_of(
            &matrix.rows,
            n_clusters,
            self.config.kmeans_max_iterations,
            self.config.kmeans_seed,
            self.config.kmeans_restarts,
        );
        let segments = build_segments(&chunks, &matrix, &clustering);

        info!(
            segments = segments.len(),
            inertia = clustering.inertia,
            iterations = clustering.iterations,
            "topic segmentation completed"
        );
        segments
    }

    pub fn analyze_topics(&self, text: &str) -> Vec<TopicSummary> {
        self.segment(text).iter().map(TopicSummary::from).collect()
    }

    fn single_segment(&self, text: &str) -> TopicSegment {
        TopicSegment {
            topic: MAIN_CONTENT_TOPIC.to_string(),
            content: text.to_string(),
            keywords: simple_keywords(text, &self.config.stopwords),
            relevance_score: 1.0,
        }
    }
}

/// [`TopicSegmenter::segment`] with default settings.
pub fn segment(text: &str) -> Vec<TopicSegment> {
    TopicSegmenter::default().segment(text)
}

fn build_segments(
    chunks: &[Chunk],
    matrix: &TfidfMatrix,
    clustering: &KmeansResult,
) -> Vec<TopicSegment> {
    let mut segments = Vec::with_capacity(clustering.k);

    for (cluster, centroid) in clustering.centroids.iter().enumerate() {
        let members = clustering.members(cluster);
        if members.is_empty() {
            continue;
        }

        let content = members
            .iter()
            .map(|&i| chunks[i].text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let top = top_terms(centroid, &matrix.vocabulary, CENTROID_TOP_TERMS);
        let member_rows: Vec<&[f64]> = members.iter().map(|&i| matrix.rows[i].as_slice()).collect();

        segments.push(TopicSegment {
            topic: topic_name(&top),
            content,
            keywords: top.into_iter().take(SEGMENT_KEYWORDS).collect(),
            relevance_score: cluster_relevance(&member_rows, centroid),
        });
    }

    // Stable: equal scores keep cluster order.
    segments.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    segments
}

/// Highest-weighted centroid terms with positive weight, at most `limit`.
/// Equal weights keep vocabulary order.
fn top_terms(centroid: &[f64], vocabulary: &[String], limit: usize) -> Vec<String> {
    let mut indices: Vec<usize> = (0..centroid.len()).collect();
    indices.sort_by(|&a, &b| centroid[b].total_cmp(&centroid[a]));
    indices
        .into_iter()
        .take(limit)
        .filter(|&i| centroid[i] > 0.0)
        .map(|i| vocabulary[i].clone())
        .collect()
}

/// First two of the top three terms longer than two characters,
/// title-cased and joined with `" - "`.
fn topic_name(terms: &[String]) -> String {
    let parts: Vec<String> = terms
        .iter()
        .take(3)
        .filter(|t| t.chars().count() > 2)
        .take(TOPIC_NAME_TERMS)
        .map(|t| title_case(t))
        .collect();

    if parts.is_empty() {
        GENERAL_TOPIC.to_string()
    } else {
        parts.join(" - ")
    }
}

fn cluster_relevance(members: &[&[f64]], centroid: &[f64]) -> f64 {
    if members.is_empty() {
        return EMPTY_CLUSTER_RELEVANCE;
    }
    let mean_distance =
        members.iter().map(|row| euclidean(row, centroid)).sum::<f64>() / members.len() as f64;
    1.0 / (1.0 + mean_distance)
}
