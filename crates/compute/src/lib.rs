//! Content analysis: TF-IDF + K-Means topic segmentation and multi-factor
//! question difficulty estimation.

pub mod algorithms;
pub mod difficulty;
pub mod segmenter;
pub mod text;

pub use algorithms::tfidf::VectorizeError;
pub use difficulty::{
    classify, ClassifierConfig, ClassifierWeights, DifficultyAnalysis, DifficultyClassifier,
};
pub use segmenter::{segment, SegmenterConfig, TopicSegment, TopicSegmenter, TopicSummary};
