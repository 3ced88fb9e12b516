//! Property-based tests for table alignment, normalization and matching.
//!
//! Checks that the invariants of a mapping run hold across random inputs:
//! merged table shape, module tags, empty-field handling, score range,
//! and first-index tie-breaking.

use namaste_map::embedding::{EmbeddingMatrix, EmbeddingProvider, HashingEmbedder};
use namaste_map::matching::{cosine_similarity, ExhaustiveIndex, SimilarityIndex, TextNormalizer};
use namaste_map::reference::ReferenceTableBuilder;
use namaste_map::Table;
use proptest::prelude::*;

fn table(name: &str, headers: &[String], rows: &[Vec<String>]) -> Table {
    let mut table = Table::new(name, headers.iter().cloned()).unwrap();
    for row in rows {
        table.push_row(row.clone()).unwrap();
    }
    table
}

/// Headers `code`, `title`, then distinct lowercase extras.
fn headers_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{3,8}", 0..4).prop_map(|extras| {
        let mut headers = vec!["code".to_string(), "title".to_string()];
        headers.extend(
            extras
                .into_iter()
                .filter(|h| h != "code" && h != "title" && h != "module"),
        );
        headers
    })
}

fn rows_strategy(width: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec("[A-Za-z0-9 ]{0,12}", width), 1..12)
}

fn module_table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    headers_strategy().prop_flat_map(|headers| {
        let width = headers.len();
        (Just(headers), rows_strategy(width))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn merged_length_modules_and_fill(
        (mms_headers, mms_rows) in module_table_strategy(),
        (tm2_headers, tm2_rows) in module_table_strategy(),
    ) {
        let mms = table("MMS", &mms_headers, &mms_rows);
        let tm2 = table("TM2", &tm2_headers, &tm2_rows);
        let unified = ReferenceTableBuilder::default().build(mms, tm2).unwrap();

        prop_assert_eq!(unified.len(), mms_rows.len() + tm2_rows.len());
        for row in 0..unified.len() {
            let expected = if row < mms_rows.len() { "MMS" } else { "TM2" };
            prop_assert_eq!(unified.value(row, "module"), Some(expected));
        }

        for header in &tm2_headers {
            if !mms_headers.contains(header) {
                for row in 0..mms_rows.len() {
                    prop_assert_eq!(unified.value(row, header), Some(""));
                }
            }
        }
        for header in &mms_headers {
            if !tm2_headers.contains(header) {
                for row in mms_rows.len()..unified.len() {
                    prop_assert_eq!(unified.value(row, header), Some(""));
                }
            }
        }

        // original row order and values survive
        for (i, original) in tm2_rows.iter().enumerate() {
            prop_assert_eq!(
                unified.value(mms_rows.len() + i, "code"),
                Some(original[0].as_str())
            );
        }
    }

    #[test]
    fn normalized_text_never_leaks_null_markers(
        display in "[A-Za-z ]{0,20}",
        synonyms in prop::option::of("[A-Za-z ]{0,20}"),
    ) {
        let normalizer = TextNormalizer::new(["display", "synonyms"]);
        let text = normalizer.normalize_with(|field| match field {
            "display" => Some(display.as_str()),
            "synonyms" => synonyms.as_deref(),
            _ => None,
        });
        prop_assert!(!text.contains("None"));
        prop_assert!(!text.contains("NaN"));
        if synonyms.as_deref().unwrap_or_default().is_empty() {
            prop_assert_eq!(text.trim(), display.trim());
        }
    }

    #[test]
    fn cosine_stays_in_range(
        pair in (1usize..16).prop_flat_map(|d| (
            prop::collection::vec(-100.0f32..100.0, d),
            prop::collection::vec(-100.0f32..100.0, d),
        ))
    ) {
        let (a, b) = pair;
        let score = cosine_similarity(&a, &b);
        prop_assert!(score.is_finite());
        prop_assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn zero_reference_vector_scores_zero(
        query in prop::collection::vec(-10.0f32..10.0, 4),
    ) {
        let matrix = EmbeddingMatrix::new(4, vec![vec![0.0; 4]], |i| i.to_string()).unwrap();
        let index = ExhaustiveIndex::new("ICD-11", matrix).unwrap();
        let nearest = index.nearest(&query).unwrap();
        prop_assert_eq!(nearest.index, 0);
        prop_assert_eq!(nearest.score, 0.0);
    }

    #[test]
    fn duplicated_best_row_resolves_to_first_copy(
        rows in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 3), 1..10),
        pick in any::<prop::sample::Index>(),
        query in prop::collection::vec(-1.0f32..1.0, 3),
    ) {
        let mut rows = rows;
        let original = EmbeddingMatrix::new(3, rows.clone(), |i| i.to_string()).unwrap();
        let best = ExhaustiveIndex::new("ICD-11", original).unwrap().nearest(&query).unwrap();

        // insert a copy of the winning row somewhere after it
        let at = best.index + 1 + pick.index(rows.len() - best.index);
        rows.insert(at, rows[best.index].clone());
        let matrix = EmbeddingMatrix::new(3, rows, |i| i.to_string()).unwrap();
        let index = ExhaustiveIndex::new("ICD-11", matrix).unwrap();

        for _ in 0..3 {
            prop_assert_eq!(index.nearest(&query).unwrap(), best);
        }
    }

    #[test]
    fn hashing_batch_equals_single(texts in prop::collection::vec("\\PC{0,30}", 0..8)) {
        let model = HashingEmbedder::new(64).unwrap();
        let batch = model.encode_batch(&texts).unwrap();
        prop_assert_eq!(batch.len(), texts.len());
        for (text, vector) in texts.iter().zip(&batch) {
            prop_assert_eq!(&model.encode(text).unwrap(), vector);
        }
    }
}
