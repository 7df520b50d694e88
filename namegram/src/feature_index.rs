//! In-memory inverted index from features to word-match records.

use crate::features::{extract_features, utf16_len, Feature};
use crate::models::{FuzzyData, FuzzyDataList, WordIndex, WordLength};
use crate::search::FuzzySearch;
use std::collections::HashMap;

pub type FeatureMap = HashMap<Feature, FuzzyDataList>;

/// Build the feature map for one document.
///
/// Terms get consecutive word indexes in order; the index stops at 255, so
/// every term past the 256th shares it.
pub fn build_feature_index<S: AsRef<str>>(doc_id: u64, terms: &[S]) -> FeatureMap {
    let mut output = FeatureMap::new();
    let mut wid = WordIndex::FIRST;

    for term in terms {
        let term = term.as_ref();
        let data = FuzzyData::new(doc_id, wid, WordLength::truncate(utf16_len(term)));

        for feature in extract_features(term) {
            output.entry(feature).or_default().push(data);
        }
        wid = wid.saturating_next();
    }
    output
}

/// Corpus-wide feature index assembled from per-document maps.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    map: FeatureMap,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document<S: AsRef<str>>(&mut self, doc_id: u64, terms: &[S]) {
        let features = build_feature_index(doc_id, terms);
        self.merge(features);
    }

    /// Union with `other`; lists for the same feature are concatenated.
    pub fn merge(&mut self, other: FeatureMap) {
        for (feature, list) in other {
            match self.map.get_mut(&feature) {
                Some(existing) => existing.extend_from(&list),
                None => {
                    self.map.insert(feature, list);
                }
            }
        }
    }

    pub fn get(&self, feature: &Feature) -> Option<&FuzzyDataList> {
        self.map.get(feature)
    }

    /// Owned copy of the list for `feature`, empty when the feature is unknown.
    pub fn lookup(&self, feature: &Feature) -> FuzzyDataList {
        self.map.get(feature).cloned().unwrap_or_default()
    }

    pub fn search(&self, query: &str, matcher: &FuzzySearch) -> Vec<u64> {
        matcher.search(query, |feature| self.lookup(feature))
    }

    /// Number of distinct features.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_map(self) -> FeatureMap {
        self.map
    }
}

impl From<FeatureMap> for FeatureIndex {
    fn from(map: FeatureMap) -> Self {
        Self { map }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(doc_id: u64, wid: u8, len: u8) -> FuzzyDataList {
        vec![FuzzyData::new(doc_id, WordIndex::new(wid), WordLength::new(len))].into()
    }

    #[test]
    fn test_features_of_one_document() {
        let exported = build_feature_index(1010, &["notes", "april8", "2018", "md"]);

        let mut correct = FeatureMap::new();
        for f in ["no", "ot", "te", "es"] {
            correct.insert(Feature::from(f), make(1010, 0, 5));
        }
        for f in ["ap", "pr", "ri", "il", "l8"] {
            correct.insert(Feature::from(f), make(1010, 1, 6));
        }
        for f in ["20", "01", "18"] {
            correct.insert(Feature::from(f), make(1010, 2, 4));
        }
        correct.insert(Feature::from("md"), make(1010, 3, 2));

        assert_eq!(exported, correct);
    }

    #[test]
    fn test_empty_terms() {
        assert!(build_feature_index::<&str>(1, &[]).is_empty());
        assert!(build_feature_index(1, &["a", "", "b"]).is_empty());
    }

    #[test]
    fn test_single_char_words_still_take_a_word_index() {
        let map = build_feature_index(3, &["a", "bc"]);
        assert_eq!(map[&Feature::from("bc")], make(3, 1, 2));
    }

    #[test]
    fn test_repeated_feature_within_document() {
        let map = build_feature_index(8, &["abab"]);
        let ab = &map[&Feature::from("ab")];
        assert_eq!(ab.len(), 2);
        assert!(ab.iter().all(|d| d.word_index.get() == 0 && d.word_length.get() == 4));
    }

    #[test]
    fn test_word_index_saturates_past_255_words() {
        let terms = vec!["ab"; 300];
        let map = build_feature_index(5, &terms);

        let wids: Vec<u8> = map[&Feature::from("ab")]
            .iter()
            .map(|d| d.word_index.get())
            .collect();
        let expected: Vec<u8> = (0..=255u8).chain(std::iter::repeat(255).take(44)).collect();
        assert_eq!(wids, expected);
    }

    #[test]
    fn test_long_word_length_truncates() {
        let long = "x".repeat(300);
        let map = build_feature_index(2, &[long.as_str()]);
        let xx = &map[&Feature::from("xx")];
        assert_eq!(xx.len(), 299);
        assert_eq!(xx[0].word_length.get(), 44);
    }

    #[test]
    fn test_merge_concatenates() {
        let mut index = FeatureIndex::new();
        index.insert_document(1, &["md"]);
        index.insert_document(2, &["md", "xmd"]);

        let md = index.lookup(&Feature::from("md"));
        let ids: Vec<(u64, u8)> = md.iter().map(|d| (d.doc_id, d.word_index.get())).collect();
        assert_eq!(ids, vec![(1, 0), (2, 0), (2, 1)]);
        assert!(index.lookup(&Feature::from("zz")).is_empty());
        assert_eq!(index.len(), 2);
    }
}
