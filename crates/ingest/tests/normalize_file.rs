use std::io::Write;

use questgen_ingest::{
    process_document, process_file, ContentValidator, DocumentFormat, ExtractionError, Normalizer,
    NormalizerConfig,
};

fn write_temp(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn normalizes_txt_file_from_disk() {
    let file = write_temp(".txt", "Capítulo   um\n\n\n\n1\n\nTexto final.".as_bytes());
    let text = Normalizer::default().normalize_file(file.path()).unwrap();
    assert_eq!(text, "Capítulo um\n\nTexto final.");
}

#[test]
fn latin1_file_is_decoded() {
    // "Educação" in ISO-8859-1.
    let file = write_temp(".txt", &[0x45, 0x64, 0x75, 0x63, 0x61, 0xE7, 0xE3, 0x6F]);
    let text = Normalizer::default().normalize_file(file.path()).unwrap();
    assert_eq!(text, "Educação");
}

#[test]
fn file_over_size_cap_is_rejected() {
    let file = write_temp(".txt", &[b'a'; 64]);
    let normalizer = Normalizer::new(NormalizerConfig {
        allowed_formats: vec![DocumentFormat::Txt],
        max_file_size_bytes: 32,
    });
    let err = normalizer.normalize_file(file.path()).unwrap_err();
    assert!(matches!(err, ExtractionError::FileTooLarge { size: 64, max: 32 }));
}

#[test]
fn disallowed_extension_is_rejected_before_reading() {
    let path = std::path::Path::new("/nonexistent/dir/notes.md");
    let err = Normalizer::default().normalize_file(path).unwrap_err();
    assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
}

#[test]
fn missing_file_is_io_error() {
    let path = std::path::Path::new("/nonexistent/dir/notes.txt");
    let err = Normalizer::default().normalize_file(path).unwrap_err();
    assert!(matches!(err, ExtractionError::Io(_)));
}

#[test]
fn processed_document_serializes() {
    let doc = process_document(
        "Um texto curto de teste.".as_bytes(),
        "txt",
        &Normalizer::default(),
        &ContentValidator::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["validation"]["word_count"], 5);
    assert_eq!(json["validation"]["is_sufficient"], false);
    assert_eq!(json["content_hash"].as_str().unwrap().len(), 16);
}

#[test]
fn process_file_fingerprints_the_normalized_text() {
    let file = write_temp(".txt", "Texto   de teste.\n\n\n\nFim.".as_bytes());
    let doc = process_file(file.path(), &Normalizer::default(), &ContentValidator::new(3)).unwrap();
    assert_eq!(doc.text, "Texto de teste.\n\nFim.");
    assert_eq!(doc.validation.word_count, 4);
    assert!(doc.validation.is_sufficient);
    assert_eq!(doc.preview, doc.text);
    assert_eq!(doc.content_hash.len(), 16);
}
