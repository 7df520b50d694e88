//! Ranking over a small filename corpus, built through the in-memory index.

use namegram::{build_feature_index, FeatureIndex, FuzzyConfig, FuzzySearch};

fn corpus() -> Vec<(u64, Vec<&'static str>)> {
    vec![
        (1, vec!["notes", "april8", "2018", "md"]),
        (2, vec!["notes", "wednesday", "04092018", "md"]),
        (3, vec!["thisissomepoorlydelimitedfile"]),
        (4, vec!["bathsroom", "png"]),
        (5, vec!["livingroom", "png"]),
        (6, vec!["washroom", "png"]),
        (7, vec!["sittingrooms", "png"]),
        (8, vec!["CS4540"]),
        (9, vec!["CS4641"]),
        (10, vec!["CS4476"]),
        (11, vec!["CS2200"]),
        (12, vec!["LMC2200"]),
    ]
}

fn build_index() -> FeatureIndex {
    let mut index = FeatureIndex::new();
    for (id, terms) in corpus() {
        index.merge(build_feature_index(id, &terms));
    }
    index
}

#[test]
fn test_typo_in_word() {
    let index = build_index();
    let fuzzy = FuzzySearch::new(2);
    assert_eq!(index.search("wensday", &fuzzy), vec![2]);
    assert_eq!(index.search("noots", &fuzzy), vec![1, 2]);
    assert_eq!(index.search("delemeted", &fuzzy), vec![3]);
}

#[test]
fn test_substring_of_long_word() {
    let index = build_index();
    assert_eq!(index.search("poorly", &FuzzySearch::new(2)), vec![3]);
}

#[test]
fn test_digits_rank_by_overlap() {
    let index = build_index();
    let fuzzy = FuzzySearch::new(2);

    // "04092018" shares only "40" but one hit of three is within tolerance
    assert_eq!(index.search("4540", &fuzzy), vec![8, 2]);
    assert_eq!(index.search("2200", &fuzzy), vec![11, 12, 1, 2]);
}

#[test]
fn test_equal_scores_rank_shorter_words_first() {
    let index = build_index();
    let ranked = FuzzySearch::new(2).rank("room", |f| index.lookup(f));

    let got: Vec<(u64, usize, u8)> = ranked
        .iter()
        .map(|m| (m.data.doc_id, m.score, m.data.word_length.get()))
        .collect();
    assert_eq!(
        got,
        vec![(6, 3, 8), (4, 3, 9), (5, 3, 10), (7, 3, 12), (3, 2, 29)]
    );
}

#[test]
fn test_zero_tolerance_requires_every_feature() {
    let index = build_index();
    let fuzzy = FuzzySearch::new(0);
    assert_eq!(index.search("room", &fuzzy), vec![6, 4, 5, 7]);
    assert_eq!(index.search("4540", &fuzzy), vec![8]);
    assert!(index.search("wensday", &fuzzy).is_empty());
}

#[test]
fn test_shared_word_across_documents() {
    let index = build_index();
    // "md" is word 3 of both documents 1 and 2
    assert_eq!(index.search("md", &FuzzySearch::new(0)), vec![1, 2]);
    assert_eq!(index.search("MD", &FuzzySearch::new(0)), vec![1, 2]);
}

#[test]
fn test_matcher_from_config() {
    let index = build_index();
    let config = FuzzyConfig::from_json(r#"{ "tolerance": 0 }"#).unwrap();
    let fuzzy = FuzzySearch::from_config(&config);
    assert_eq!(fuzzy.tolerance(), 0);
    assert_eq!(index.search("2200", &fuzzy), vec![11, 12]);
}

#[test]
fn test_unknown_query() {
    let index = build_index();
    assert!(index.search("qqqq", &FuzzySearch::new(2)).is_empty());
    assert!(index.search("", &FuzzySearch::new(2)).is_empty());
    assert!(index.search("q", &FuzzySearch::new(2)).is_empty());
}
