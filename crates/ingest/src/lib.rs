//! Document intake: format-aware text extraction, boilerplate cleanup and
//! content sufficiency checks.

pub mod document;
pub mod normalize;
pub mod process;
pub mod validate;

pub use document::{DocumentFormat, ExtractedDocument, ExtractionError, PageContent};
pub use normalize::{clean_text, Normalizer, NormalizerConfig};
pub use process::{process_document, process_file, ProcessedDocument};
pub use validate::{validate, ContentValidation, ContentValidator};
