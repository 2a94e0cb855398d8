#[cfg(test)]
mod tests {
    use crate::algorithms::kmeans::KmeansResult;
    use crate::algorithms::tfidf::TfidfMatrix;
    use crate::segmenter::{
        build_segments, cluster_relevance, segment, top_terms, topic_name, Chunk,
        SegmenterConfig, TopicSegmenter, GENERAL_TOPIC, MAIN_CONTENT_TOPIC,
    };

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn segmenter(min_chunk_words: usize, topic_count: usize) -> TopicSegmenter {
        TopicSegmenter::new(SegmenterConfig {
            min_chunk_words,
            topic_count,
            ..SegmenterConfig::default()
        })
    }

    #[test]
    fn topic_name_uses_first_two_long_terms() {
        let terms = strings(&["fotossíntese", "ab", "clorofila luz", "água"]);
        assert_eq!(topic_name(&terms), "Fotossíntese - Clorofila Luz");
    }

    #[test]
    fn topic_name_only_looks_at_top_three() {
        let terms = strings(&["ab", "cd", "ef", "mitocôndria"]);
        assert_eq!(topic_name(&terms), GENERAL_TOPIC);
        assert_eq!(topic_name(&[]), GENERAL_TOPIC);
    }

    #[test]
    fn top_terms_skip_zero_weights_and_keep_vocabulary_order_on_ties() {
        let vocabulary = strings(&["a", "b", "c", "d"]);
        let centroid = [0.1, 0.5, 0.0, 0.5];
        assert_eq!(top_terms(&centroid, &vocabulary, 10), vec!["b", "d", "a"]);
        assert_eq!(top_terms(&centroid, &vocabulary, 1), vec!["b"]);
    }

    #[test]
    fn relevance_of_tight_and_empty_clusters() {
        let centroid = [0.5, 0.5];
        let row: &[f64] = &[0.5, 0.5];
        assert_eq!(cluster_relevance(&[row], &centroid), 1.0);
        assert_eq!(cluster_relevance(&[], &centroid), 0.5);

        let far: &[f64] = &[1.5, 0.5];
        let score = cluster_relevance(&[row, far], &centroid);
        assert!((score - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn single_chunk_is_one_segment_with_full_relevance() {
        let text = "A fotossíntese converte luz em energia química.\n\nA clorofila absorve luz.";
        let segments = segment(text);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].topic, MAIN_CONTENT_TOPIC);
        assert_eq!(segments[0].content, text);
        assert_eq!(segments[0].relevance_score, 1.0);
        // "luz" is below the four-letter minimum.
        assert_eq!(segments[0].keywords[0], "fotossíntese");
        assert_eq!(segments[0].keywords.len(), 5);
    }

    #[test]
    fn empty_text_is_one_empty_segment() {
        let segments = segment("");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "");
        assert!(segments[0].keywords.is_empty());
    }

    #[test]
    fn empty_vocabulary_falls_back_to_single_segment() {
        let text = "de da do\n\na o e";
        let segments = segmenter(3, 5).segment(text);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].topic, MAIN_CONTENT_TOPIC);
        assert_eq!(segments[0].content, text);
        assert_eq!(segments[0].relevance_score, 1.0);
    }

    #[test]
    fn topic_count_is_capped_by_chunk_count() {
        let text = "mercado inflação juros\n\ncélula membrana núcleo\n\nplaneta órbita estrela";
        let segments = segmenter(3, 10).segment(text);
        assert!(segments.len() <= 3);
        let total: usize = segments
            .iter()
            .map(|s| s.content.split("\n\n").count())
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn segments_are_sorted_by_relevance() {
        let text = "mercado inflação juros\n\nmercado inflação juros\n\n\
                    célula membrana núcleo\n\nplaneta órbita estrela";
        let segments = segmenter(3, 3).segment(text);
        for pair in segments.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        for s in &segments {
            assert!(s.relevance_score > 0.0 && s.relevance_score <= 1.0);
        }
    }

    #[test]
    fn analyze_topics_reports_word_counts() {
        let text = "mercado inflação juros\n\ncélula membrana núcleo";
        let seg = segmenter(3, 2);
        let summaries = seg.analyze_topics(text);
        let segments = seg.segment(text);
        assert_eq!(summaries.len(), segments.len());
        assert_eq!(summaries.iter().map(|s| s.word_count).sum::<usize>(), 6);
        assert_eq!(summaries[0].topic, segments[0].topic);
    }

    #[test]
    fn equal_relevance_keeps_cluster_order() {
        let chunks = vec![
            Chunk { text: "quimica organica".into(), word_count: 2 },
            Chunk { text: "fisica moderna".into(), word_count: 2 },
        ];
        let chemistry = vec![0.0, 0.0, 0.7, 0.7];
        let physics = vec![0.7, 0.7, 0.0, 0.0];
        let matrix = TfidfMatrix {
            vocabulary: strings(&["fisica", "moderna", "organica", "quimica"]),
            rows: vec![chemistry.clone(), physics.clone()],
        };
        let clustering = |assignments: Vec<usize>, centroids: Vec<Vec<f64>>| KmeansResult {
            assignments,
            centroids,
            k: 2,
            iterations: 1,
            inertia: 0.0,
        };

        // Every member sits on its centroid, so both clusters score 1.0.
        let segments = build_segments(
            &chunks,
            &matrix,
            &clustering(vec![0, 1], vec![chemistry.clone(), physics.clone()]),
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].relevance_score, segments[1].relevance_score);
        assert_eq!(segments[0].content, "quimica organica");
        assert_eq!(segments[1].content, "fisica moderna");

        let segments =
            build_segments(&chunks, &matrix, &clustering(vec![1, 0], vec![physics, chemistry]));
        assert_eq!(segments[0].content, "fisica moderna");
        assert_eq!(segments[1].content, "quimica organica");
    }
}
