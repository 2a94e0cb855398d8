pub mod kmeans;
pub mod tfidf;
