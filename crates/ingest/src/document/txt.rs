use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

use super::PageContent;

/// Decode text bytes, guessing the encoding.
///
/// A byte-order mark wins. Valid UTF-8 is taken as is, and text that is
/// mostly well-formed UTF-8 is decoded lossily. Anything else goes through
/// the legacy-encoding detector. Undecodable bytes become U+FFFD.
pub fn decode_text(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), UTF_8);
    }

    let (multibyte, invalid) = utf8_profile(bytes);
    let encoding = if multibyte > invalid {
        UTF_8
    } else {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, false)
    };

    let (text, malformed) = encoding.decode_without_bom_handling(bytes);
    if malformed {
        tracing::debug!(encoding = encoding.name(), "replaced malformed byte sequences");
    }
    (text.into_owned(), encoding)
}

/// Count well-formed multi-byte UTF-8 characters and malformed sequences.
fn utf8_profile(bytes: &[u8]) -> (usize, usize) {
    let count_multibyte = |s: &str| s.chars().filter(|c| c.len_utf8() > 1).count();

    let mut multibyte = 0;
    let mut invalid = 0;
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                multibyte += count_multibyte(s);
                return (multibyte, invalid);
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                multibyte += std::str::from_utf8(valid).map(count_multibyte).unwrap_or(0);
                invalid += 1;
                let skip = e.error_len().unwrap_or(after.len()).max(1);
                rest = &after[skip.min(after.len())..];
            }
        }
    }
}

pub fn extract_txt(bytes: &[u8]) -> Vec<PageContent> {
    let (text, encoding) = decode_text(bytes);
    tracing::debug!(encoding = encoding.name(), bytes = bytes.len(), "decoded text document");

    vec![PageContent {
        page_number: 1,
        text,
    }]
}

#[cfg(test)]
mod tests {
    use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

    use super::*;

    const LEGACY_SAMPLE: &str = "A educação à distância exige avaliação contínua. \
        O professor disse “a organização é fundamental” e reforçou que a \
        informação não substitui a reflexão. Cada lição traz questões sobre \
        conceitos, aplicação prática e análise crítica do conteúdo estudado.";

    #[test]
    fn extract_simple_text() {
        let content = b"Hello, world!\nThis is a test file.";
        let pages = extract_txt(content);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("Hello, world!"));
    }

    #[test]
    fn utf8_text_is_kept_verbatim() {
        let content = "Educação à distância: avaliação".as_bytes();
        let (text, encoding) = decode_text(content);
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "Educação à distância: avaliação");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice("olá".as_bytes());
        let (text, encoding) = decode_text(&content);
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "olá");
    }

    #[test]
    fn legacy_western_text_is_detected() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(LEGACY_SAMPLE);
        assert!(!unmappable);
        assert!(std::str::from_utf8(&bytes).is_err());

        let (text, encoding) = decode_text(&bytes);
        assert_ne!(encoding, UTF_8);
        assert_eq!(text, LEGACY_SAMPLE);
    }

    #[test]
    fn mostly_utf8_is_decoded_lossily() {
        let mut content = "informação, educação, avaliação ".as_bytes().to_vec();
        content.push(0xFF);
        let (text, encoding) = decode_text(&content);
        assert_eq!(encoding, UTF_8);
        assert!(text.starts_with("informação"));
        assert!(text.ends_with('\u{FFFD}'));
    }

    #[test]
    fn utf16_le_with_bom() {
        let mut content = vec![0xFF, 0xFE];
        for unit in "olá".encode_utf16() {
            content.extend_from_slice(&unit.to_le_bytes());
        }
        let (text, encoding) = decode_text(&content);
        assert_eq!(encoding, UTF_16LE);
        assert_eq!(text, "olá");
    }

    #[test]
    fn utf16_be_odd_length_gets_replacement() {
        let mut content = vec![0xFE, 0xFF];
        for unit in "ok".encode_utf16() {
            content.extend_from_slice(&unit.to_be_bytes());
        }
        content.push(0x00);
        let (text, encoding) = decode_text(&content);
        assert_eq!(encoding, UTF_16BE);
        assert_eq!(text, "ok\u{FFFD}");
    }

    #[test]
    fn extract_empty_text() {
        let pages = extract_txt(b"");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "");
    }
}
