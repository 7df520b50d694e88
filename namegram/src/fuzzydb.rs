//! Persistent bigram index for fuzzy filename lookup.
//!
//! One row per bigram in a single SQLite table; the value is the encoded list
//! of document ids whose terms contain that bigram. Bigrams here are taken
//! as written, without case folding.
//!
//! A `FuzzyDb` borrows one transaction for its whole life. It is not meant to
//! be shared across threads; the caller owns begin/commit/abort.

use crate::codec;
use crate::config::{ConfigError, FuzzyConfig};
use crate::database::{table_exists, validate_table_name, DatabaseResult};
use crate::features::{raw_bigrams, Feature};
use crate::models::PostingList;
use crate::postings::{OwningPostingIterator, PostingIterator};
use crate::terms::TermSource;
use rusqlite::{params, OptionalExtension, Transaction};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Handle to an existing fuzzy index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyTable {
    name: String,
}

impl FuzzyTable {
    /// Create the table if it is missing.
    pub fn create(txn: &Transaction<'_>, name: &str) -> DatabaseResult<Self> {
        validate_table_name(name)?;
        txn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                feature BLOB PRIMARY KEY,
                postings BLOB NOT NULL
            ) WITHOUT ROWID"
        ))?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Open an existing table. `None` means the index was never built.
    pub fn open(txn: &Transaction<'_>, name: &str) -> DatabaseResult<Option<Self>> {
        validate_table_name(name)?;
        if !table_exists(txn, name)? {
            debug!(table = name, "fuzzy index table does not exist");
            return Ok(None);
        }
        Ok(Some(Self {
            name: name.to_string(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Counters reported by `FuzzyDb::sync_terms`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub documents: usize,
    pub terms_indexed: usize,
    pub terms_skipped: usize,
    pub postings_written: usize,
}

pub struct FuzzyDb<'txn> {
    txn: &'txn Transaction<'txn>,
    table: FuzzyTable,
    config: FuzzyConfig,
}

impl<'txn> FuzzyDb<'txn> {
    /// Default settings, bound to `table` whatever its name.
    pub fn new(table: FuzzyTable, txn: &'txn Transaction<'txn>) -> Self {
        let config = FuzzyConfig {
            table_name: table.name.clone(),
            ..FuzzyConfig::default()
        };
        Self { txn, table, config }
    }

    /// Fails if `config` is invalid or names a different table.
    pub fn with_config(
        table: FuzzyTable,
        txn: &'txn Transaction<'txn>,
        config: &FuzzyConfig,
    ) -> DatabaseResult<Self> {
        config.validate()?;
        if config.table_name != table.name {
            return Err(ConfigError::Invalid(format!(
                "table_name {:?} does not match table {:?}",
                config.table_name, table.name
            ))
            .into());
        }
        Ok(Self {
            txn,
            table,
            config: config.clone(),
        })
    }

    /// Create the table named by `config` if missing and bind to it.
    pub fn create(txn: &'txn Transaction<'txn>, config: &FuzzyConfig) -> DatabaseResult<Self> {
        config.validate()?;
        let table = FuzzyTable::create(txn, &config.table_name)?;
        Self::with_config(table, txn, config)
    }

    /// Bind to the table named by `config`. `None` means the index was never built.
    pub fn open(
        txn: &'txn Transaction<'txn>,
        config: &FuzzyConfig,
    ) -> DatabaseResult<Option<Self>> {
        config.validate()?;
        match FuzzyTable::open(txn, &config.table_name)? {
            Some(table) => Ok(Some(Self::with_config(table, txn, config)?)),
            None => Ok(None),
        }
    }

    pub fn table(&self) -> &FuzzyTable {
        &self.table
    }

    /// Store `list` as the posting list of `bigram`, replacing any previous one.
    /// Repeated ids are written once, at their first position.
    ///
    /// # Panics
    /// Panics if `bigram` or `list` is empty.
    pub fn put(&self, bigram: &Feature, list: &PostingList) -> DatabaseResult<()> {
        assert!(!bigram.is_empty(), "FuzzyDb::put: empty bigram");
        assert!(!list.is_empty(), "FuzzyDb::put: empty posting list");

        let mut seen = HashSet::with_capacity(list.len());
        let ids: Vec<u64> = list.iter().copied().filter(|id| seen.insert(*id)).collect();
        let bytes = codec::encode(&ids);
        self.txn
            .prepare_cached(&format!(
                "INSERT OR REPLACE INTO {} (feature, postings) VALUES (?1, ?2)",
                self.table.name
            ))?
            .execute(params![bigram.as_bytes(), bytes])?;
        Ok(())
    }

    /// The posting list of `bigram`, empty when the bigram is not indexed.
    pub fn get(&self, bigram: &Feature) -> DatabaseResult<PostingList> {
        match self.raw_get(bigram)? {
            Some(bytes) => Ok(codec::decode(&bytes)?.into()),
            None => Ok(PostingList::new()),
        }
    }

    fn raw_get(&self, bigram: &Feature) -> DatabaseResult<Option<Vec<u8>>> {
        debug_assert!(!bigram.is_empty());
        let bytes = self
            .txn
            .prepare_cached(&format!(
                "SELECT postings FROM {} WHERE feature = ?1",
                self.table.name
            ))?
            .query_row([bigram.as_bytes()], |row| row.get(0))
            .optional()?;
        Ok(bytes)
    }

    fn delete(&self, bigram: &Feature) -> DatabaseResult<()> {
        self.txn
            .prepare_cached(&format!("DELETE FROM {} WHERE feature = ?1", self.table.name))?
            .execute([bigram.as_bytes()])?;
        Ok(())
    }

    /// Index every term of every document in `source`.
    ///
    /// Each bigram of each term is a read-modify-write of its posting list,
    /// appending the document id when missing. Already-indexed documents are
    /// left as they are, so running it twice is harmless.
    pub fn sync_terms<S: TermSource + ?Sized>(&self, source: &S) -> DatabaseResult<SyncStats> {
        #[cfg(feature = "perf-log")]
        let t0 = std::time::Instant::now();

        let mut stats = SyncStats::default();
        for doc in source.document_terms()? {
            if doc.doc_id == 0 {
                warn!("skipping document with reserved id 0");
                continue;
            }
            stats.documents += 1;

            for term in &doc.terms {
                if self.config.is_excluded(term) {
                    stats.terms_skipped += 1;
                    continue;
                }
                stats.terms_indexed += 1;

                for bigram in raw_bigrams(term) {
                    let mut ids = self.get(&bigram)?;
                    if ids.insert(doc.doc_id) {
                        self.put(&bigram, &ids)?;
                        stats.postings_written += 1;
                    }
                }
            }
        }

        #[cfg(feature = "perf-log")]
        eprintln!("[perf] sync_terms={:.1}ms", t0.elapsed().as_secs_f64() * 1000.0);

        info!(
            table = %self.table.name,
            documents = stats.documents,
            terms_indexed = stats.terms_indexed,
            terms_skipped = stats.terms_skipped,
            postings_written = stats.postings_written,
            "synced fuzzy index"
        );
        Ok(stats)
    }

    /// Drop `doc_id` from the bigrams of `terms`. Rows left empty are deleted.
    pub fn remove_document<S: AsRef<str>>(
        &self,
        doc_id: u64,
        terms: &[S],
    ) -> DatabaseResult<usize> {
        let mut removed = 0;
        for term in terms {
            let term = term.as_ref();
            if self.config.is_excluded(term) {
                continue;
            }
            for bigram in raw_bigrams(term) {
                let mut ids = self.get(&bigram)?;
                if !ids.remove(doc_id) {
                    continue;
                }
                if ids.is_empty() {
                    self.delete(&bigram)?;
                } else {
                    self.put(&bigram, &ids)?;
                }
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Documents sharing enough bigrams with `term`.
    ///
    /// A document qualifies when it misses at most `iter_slack` of the term's
    /// bigrams. Results come in ascending id order, not by how many bigrams
    /// matched.
    pub fn iter(&self, term: &str) -> DatabaseResult<Box<dyn PostingIterator>> {
        let bigrams = raw_bigrams(term);
        let mut scores: BTreeMap<u64, usize> = BTreeMap::new();

        for bigram in &bigrams {
            for &id in self.get(bigram)?.iter() {
                *scores.entry(id).or_insert(0) += 1;
            }
        }

        let mut found = OwningPostingIterator::default();
        for (id, score) in scores {
            if score + self.config.iter_slack >= bigrams.len() {
                found.push(id);
            }
        }

        debug!(term, bigrams = bigrams.len(), matches = found.len(), "fuzzy iter");
        Ok(Box::new(found))
    }

    /// Number of bigrams stored in the table.
    pub fn feature_count(&self) -> DatabaseResult<u64> {
        let count: i64 = self.txn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
