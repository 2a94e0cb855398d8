use super::txt::decode_text;
use super::PageContent;

/// Markdown is read as text; heading markers are reduced to their titles so
/// they do not leak `#` runs into topic keywords.
pub fn extract_md(bytes: &[u8]) -> Vec<PageContent> {
    let (text, _) = decode_text(bytes);

    let text = text
        .lines()
        .map(|line| {
            if line.starts_with('#') {
                line.trim_start_matches('#').trim()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    vec![PageContent {
        page_number: 1,
        text,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_heading_markers() {
        let content = b"# Title\n\nSome text.\n\n## Section 1\n\nMore text.";
        let pages = extract_md(content);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "Title\n\nSome text.\n\nSection 1\n\nMore text.");
    }

    #[test]
    fn no_headings() {
        let content = b"Just plain text without any headings.";
        let pages = extract_md(content);
        assert_eq!(pages[0].text, "Just plain text without any headings.");
    }

    #[test]
    fn empty_markdown() {
        let pages = extract_md(b"");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "");
    }
}
