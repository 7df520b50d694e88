//! namegram - fuzzy bigram index for finding files by approximate name
//!
//! Names are broken into overlapping two-unit bigrams. An in-memory path
//! (`feature_index` + `search`) scores every indexed word by how many query
//! bigrams it shares and ranks the survivors. A persistent path (`fuzzydb`)
//! keeps bigram → document-id posting lists in SQLite and answers queries with
//! a posting iterator that composes with `postings` combinators.

pub mod codec;
pub mod config;
pub mod database;
pub mod feature_index;
pub mod features;
pub mod fuzzydb;
pub mod models;
pub mod postings;
pub mod search;
pub mod terms;

pub use config::{ConfigError, FuzzyConfig};
pub use database::{DatabaseError, DatabaseResult, IndexDatabase};
pub use feature_index::{build_feature_index, FeatureIndex, FeatureMap};
pub use features::{extract_features, raw_bigrams, BigramStrategy, Feature};
pub use fuzzydb::{FuzzyDb, FuzzyTable, SyncStats};
pub use models::{DocumentIds, FuzzyData, FuzzyDataList, PostingList, WordIndex, WordLength};
pub use postings::{AndPostingIterator, OrPostingIterator, OwningPostingIterator, PostingIterator};
pub use search::{FuzzySearch, RankedMatch};
pub use terms::{DocTermsTable, DocumentTerms, TermSource};
