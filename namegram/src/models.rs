//! Posting records and lists.
//!
//! The in-memory index keeps one `FuzzyData` per matching word so the matcher
//! can score words independently. The persistent index only stores bare
//! document ids. Both list types expose their ids through `DocumentIds`.

use std::ops::Deref;

/// Position of a word within its document. Saturates at 255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordIndex(u8);

impl WordIndex {
    pub const FIRST: WordIndex = WordIndex(0);
    pub const MAX: WordIndex = WordIndex(u8::MAX);

    pub fn new(value: u8) -> Self {
        WordIndex(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The next index; documents with more than 256 words pile up on 255.
    pub fn saturating_next(self) -> Self {
        WordIndex(self.0.saturating_add(1))
    }
}

/// Word length in UTF-16 code units, truncated to 8 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordLength(u8);

impl WordLength {
    pub fn new(value: u8) -> Self {
        WordLength(value)
    }

    /// Keeps the low 8 bits, so a 300-unit word records as 44.
    pub fn truncate(units: usize) -> Self {
        WordLength(units as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Identifies which word of which document produced a feature match.
///
/// Ordering is by document, then word index. Word length participates last
/// only to keep `Ord` consistent with `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuzzyData {
    pub doc_id: u64,
    pub word_index: WordIndex,
    pub word_length: WordLength,
}

impl FuzzyData {
    pub fn new(doc_id: u64, word_index: WordIndex, word_length: WordLength) -> Self {
        Self {
            doc_id,
            word_index,
            word_length,
        }
    }
}

/// Word-match records sharing one feature, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzyDataList(Vec<FuzzyData>);

impl FuzzyDataList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, data: FuzzyData) {
        self.0.push(data);
    }

    pub fn extend_from(&mut self, other: &FuzzyDataList) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Deref for FuzzyDataList {
    type Target = [FuzzyData];

    fn deref(&self) -> &[FuzzyData] {
        &self.0
    }
}

impl From<Vec<FuzzyData>> for FuzzyDataList {
    fn from(v: Vec<FuzzyData>) -> Self {
        Self(v)
    }
}

impl FromIterator<FuzzyData> for FuzzyDataList {
    fn from_iter<I: IntoIterator<Item = FuzzyData>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Document ids stored for one feature in the persistent index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList(Vec<u64>);

impl PostingList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `id` unless already present. Returns whether the list changed.
    pub fn insert(&mut self, id: u64) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes `id` if present. Returns whether the list changed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.0.len();
        self.0.retain(|&x| x != id);
        self.0.len() != before
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.0
    }
}

impl Deref for PostingList {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

impl From<Vec<u64>> for PostingList {
    fn from(v: Vec<u64>) -> Self {
        Self(v)
    }
}

/// Yields the document ids of a posting list in stored order.
pub trait DocumentIds {
    fn document_ids(&self) -> impl Iterator<Item = u64> + '_;
}

impl DocumentIds for FuzzyDataList {
    fn document_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().map(|d| d.doc_id)
    }
}

impl DocumentIds for PostingList {
    fn document_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_index_saturates() {
        let mut wid = WordIndex::FIRST;
        for _ in 0..300 {
            wid = wid.saturating_next();
        }
        assert_eq!(wid, WordIndex::MAX);
        assert_eq!(WordIndex::new(254).saturating_next().get(), 255);
    }

    #[test]
    fn test_word_length_truncates() {
        assert_eq!(WordLength::truncate(5).get(), 5);
        assert_eq!(WordLength::truncate(255).get(), 255);
        assert_eq!(WordLength::truncate(256).get(), 0);
        assert_eq!(WordLength::truncate(300).get(), 44);
    }

    #[test]
    fn test_fuzzy_data_ordering() {
        let a = FuzzyData::new(1, WordIndex::new(3), WordLength::new(9));
        let b = FuzzyData::new(2, WordIndex::new(0), WordLength::new(1));
        let c = FuzzyData::new(2, WordIndex::new(1), WordLength::new(1));
        assert!(a < b);
        assert!(b < c);
        assert_ne!(b, FuzzyData::new(2, WordIndex::new(0), WordLength::new(2)));
    }

    #[test]
    fn test_posting_list_dedup() {
        let mut list = PostingList::new();
        assert!(list.insert(7));
        assert!(list.insert(3));
        assert!(!list.insert(7));
        assert_eq!(&*list, &[7, 3]);

        assert!(list.remove(7));
        assert!(!list.remove(7));
        assert_eq!(list.into_vec(), vec![3]);
    }

    #[test]
    fn test_document_ids_shared_capability() {
        let fuzzy: FuzzyDataList = vec![
            FuzzyData::new(4, WordIndex::new(0), WordLength::new(3)),
            FuzzyData::new(4, WordIndex::new(1), WordLength::new(5)),
            FuzzyData::new(9, WordIndex::new(0), WordLength::new(2)),
        ]
        .into();
        let postings = PostingList::from(vec![4, 9]);

        assert_eq!(fuzzy.document_ids().collect::<Vec<_>>(), vec![4, 4, 9]);
        assert_eq!(postings.document_ids().collect::<Vec<_>>(), vec![4, 9]);
    }
}
