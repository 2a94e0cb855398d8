use std::collections::HashSet;

use proptest::prelude::*;
use questgen_compute::segmenter::split_into_chunks;
use questgen_compute::{SegmenterConfig, TopicSegmenter};

const BIOLOGY: [&str; 20] = [
    "célula", "mitocôndria", "fotossíntese", "clorofila", "proteína", "enzima", "membrana",
    "núcleo", "cromossomo", "genética", "organismo", "respiração", "metabolismo", "ribossomo",
    "citoplasma", "evolução", "espécie", "bactéria", "tecido", "molécula",
];

const ECONOMICS: [&str; 20] = [
    "mercado", "inflação", "juros", "demanda", "oferta", "moeda", "crédito", "investimento",
    "consumo", "imposto", "salário", "preço", "capital", "exportação", "renda", "banco",
    "dívida", "orçamento", "câmbio", "produção",
];

/// A 100-word paragraph cycling through `vocabulary` from `offset`.
fn paragraph(vocabulary: &[&str], offset: usize) -> String {
    (0..100)
        .map(|j| vocabulary[(offset + j) % vocabulary.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn two_subject_document() -> String {
    let mut paragraphs: Vec<String> = (0..6).map(|i| paragraph(&BIOLOGY, i)).collect();
    paragraphs.extend((0..6).map(|i| paragraph(&ECONOMICS, i * 3)));
    paragraphs.join("\n\n")
}

fn sorted_words(text: &str) -> Vec<&str> {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    words.sort_unstable();
    words
}

#[test]
fn distinct_vocabularies_split_into_disjoint_topics() {
    let text = two_subject_document();
    assert_eq!(text.split_whitespace().count(), 1200);

    let segments = TopicSegmenter::with_topic_count(2).segment(&text);
    assert_eq!(segments.len(), 2);

    let first: HashSet<&String> = segments[0].keywords.iter().collect();
    let second: HashSet<&String> = segments[1].keywords.iter().collect();
    assert!(!first.is_empty() && !second.is_empty());
    assert!(first.is_disjoint(&second), "{first:?} vs {second:?}");

    let biology: HashSet<&str> = BIOLOGY.into_iter().collect();
    for segment in &segments {
        let words: Vec<&str> = segment.content.split_whitespace().collect();
        assert_eq!(words.len(), 600);
        let bio_words = words.iter().filter(|w| biology.contains(*w)).count();
        assert!(bio_words == 0 || bio_words == 600);
    }
}

#[test]
fn same_input_gives_same_segments() {
    let text = two_subject_document();
    let segmenter = TopicSegmenter::with_topic_count(3);
    assert_eq!(segmenter.segment(&text), segmenter.segment(&text));
}

#[test]
fn topic_names_come_from_centroid_terms() {
    let segments = TopicSegmenter::with_topic_count(2).segment(&two_subject_document());
    for segment in &segments {
        assert_ne!(segment.topic, "Tópico Geral");
        let first_keyword = &segment.keywords[0];
        let mut chars = first_keyword.chars();
        let expected_start: String = chars.next().into_iter().flat_map(char::to_uppercase).collect();
        assert!(segment.topic.starts_with(&expected_start));
        assert!(segment.relevance_score > 0.0 && segment.relevance_score <= 1.0);
    }
}

fn paragraph_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "átomo", "energia", "massa", "força", "campo", "onda", "partícula", "órbita", "luz",
            "carga",
        ]),
        1..15,
    )
    .prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn segments_partition_the_chunks(
        paragraphs in prop::collection::vec(paragraph_strategy(), 1..12),
        topics in 1usize..5,
    ) {
        let text = paragraphs.join("\n\n");
        let segmenter = TopicSegmenter::new(SegmenterConfig {
            topic_count: topics,
            min_chunk_words: 10,
            kmeans_restarts: 2,
            ..SegmenterConfig::default()
        });

        let segments = segmenter.segment(&text);
        prop_assert!(!segments.is_empty());

        let combined = segments
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        prop_assert_eq!(sorted_words(&combined), sorted_words(&text));

        for pair in segments.windows(2) {
            prop_assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
    }

    #[test]
    fn single_chunk_text_is_one_full_segment(paragraphs in prop::collection::vec(paragraph_strategy(), 1..4)) {
        let text = paragraphs.join("\n\n");
        prop_assume!(split_into_chunks(&text, 100).len() == 1);

        let segments = TopicSegmenter::default().segment(&text);
        prop_assert_eq!(segments.len(), 1);
        prop_assert_eq!(segments[0].relevance_score, 1.0);
        prop_assert_eq!(&segments[0].content, &text);
    }
}
