//! Tolerance-scored fuzzy matching over bigram features.
//!
//! Each word-match record that shares features with the query is scored by
//! the number of query features it matched. A record passes when at most
//! `tolerance` query features missed it. Passing records rank by score, then
//! by shorter matched word.

use crate::config::FuzzyConfig;
use crate::features::{extract_features, Feature};
use crate::models::{FuzzyData, FuzzyDataList};
use std::collections::BTreeMap;

/// A qualifying word-match record and the number of query features it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch {
    pub data: FuzzyData,
    pub score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzySearch {
    tolerance: usize,
}

impl FuzzySearch {
    pub fn new(tolerance: usize) -> Self {
        Self { tolerance }
    }

    pub fn from_config(config: &FuzzyConfig) -> Self {
        Self::new(config.tolerance)
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    /// Score and rank the records reachable from `query`'s features.
    ///
    /// `lookup` runs once per query feature, duplicates included. It hands
    /// back an owned list, so a lookup that refills one scratch buffer on
    /// every call cannot disturb lists returned earlier.
    pub fn rank<F>(&self, query: &str, mut lookup: F) -> Vec<RankedMatch>
    where
        F: FnMut(&Feature) -> FuzzyDataList,
    {
        let features = extract_features(query);
        if features.is_empty() {
            return Vec::new();
        }

        let mut scores: BTreeMap<FuzzyData, usize> = BTreeMap::new();
        for feature in &features {
            let documents = lookup(feature);
            for doc in documents.iter() {
                *scores.entry(*doc).or_insert(0) += 1;
            }
        }

        let needed = features.len();
        let mut passing: Vec<RankedMatch> = scores
            .into_iter()
            .filter(|&(_, score)| score + self.tolerance >= needed)
            .map(|(data, score)| RankedMatch { data, score })
            .collect();

        // Stable: equal score and length keep document order
        passing.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.data.word_length.cmp(&b.data.word_length))
        });

        passing
    }

    /// Document ids of the ranked records. A document shows up once per
    /// matching word.
    pub fn search<F>(&self, query: &str, lookup: F) -> Vec<u64>
    where
        F: FnMut(&Feature) -> FuzzyDataList,
    {
        self.rank(query, lookup)
            .into_iter()
            .map(|m| m.data.doc_id)
            .collect()
    }
}
