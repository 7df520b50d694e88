//! Sources of per-document terms for bulk reindexing.

use crate::codec::{decode_terms, encode_terms};
use crate::database::{table_exists, validate_table_name, DatabaseResult};
use rusqlite::{params, OptionalExtension, Transaction};
use std::collections::BTreeMap;
use tracing::debug;

pub const DOC_TERMS_TABLE: &str = "docterms";

/// The terms of one document, in document order. Order decides word indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTerms {
    pub doc_id: u64,
    pub terms: Vec<String>,
}

pub trait TermSource {
    fn document_terms(&self) -> DatabaseResult<Vec<DocumentTerms>>;
}

impl TermSource for BTreeMap<u64, Vec<String>> {
    fn document_terms(&self) -> DatabaseResult<Vec<DocumentTerms>> {
        Ok(self
            .iter()
            .map(|(&doc_id, terms)| DocumentTerms {
                doc_id,
                terms: terms.clone(),
            })
            .collect())
    }
}

impl TermSource for [DocumentTerms] {
    fn document_terms(&self) -> DatabaseResult<Vec<DocumentTerms>> {
        Ok(self.to_vec())
    }
}

/// Document id → filename terms, stored NUL-separated in one SQLite table.
pub struct DocTermsTable<'txn> {
    txn: &'txn Transaction<'txn>,
    name: String,
}

impl<'txn> DocTermsTable<'txn> {
    pub fn create(txn: &'txn Transaction<'txn>, name: &str) -> DatabaseResult<Self> {
        validate_table_name(name)?;
        txn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                id INTEGER PRIMARY KEY,
                terms BLOB NOT NULL
            )"
        ))?;
        Ok(Self {
            txn,
            name: name.to_string(),
        })
    }

    /// `None` when the table has never been created.
    pub fn open(txn: &'txn Transaction<'txn>, name: &str) -> DatabaseResult<Option<Self>> {
        validate_table_name(name)?;
        if !table_exists(txn, name)? {
            debug!(table = name, "doc terms table does not exist");
            return Ok(None);
        }
        Ok(Some(Self {
            txn,
            name: name.to_string(),
        }))
    }

    pub fn put(&self, doc_id: u64, terms: &[String]) -> DatabaseResult<()> {
        let bytes = encode_terms(terms)?;
        self.txn
            .prepare_cached(&format!(
                "INSERT OR REPLACE INTO {} (id, terms) VALUES (?1, ?2)",
                self.name
            ))?
            .execute(params![doc_id as i64, bytes])?;
        Ok(())
    }

    pub fn get(&self, doc_id: u64) -> DatabaseResult<Option<Vec<String>>> {
        let bytes: Option<Vec<u8>> = self
            .txn
            .prepare_cached(&format!("SELECT terms FROM {} WHERE id = ?1", self.name))?
            .query_row([doc_id as i64], |row| row.get(0))
            .optional()?;
        Ok(bytes.map(|b| decode_terms(&b)))
    }

    /// Returns whether a row was deleted.
    pub fn remove(&self, doc_id: u64) -> DatabaseResult<bool> {
        let changed = self
            .txn
            .prepare_cached(&format!("DELETE FROM {} WHERE id = ?1", self.name))?
            .execute([doc_id as i64])?;
        Ok(changed > 0)
    }
}

impl TermSource for DocTermsTable<'_> {
    fn document_terms(&self) -> DatabaseResult<Vec<DocumentTerms>> {
        let mut stmt = self
            .txn
            .prepare(&format!("SELECT id, terms FROM {}", self.name))?;
        let mut docs = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let bytes: Vec<u8> = row.get(1)?;
                Ok(DocumentTerms {
                    doc_id: id as u64,
                    terms: decode_terms(&bytes),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        // rowids sort signed; ids above i64::MAX come back negative
        docs.sort_by_key(|d| d.doc_id);
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::IndexDatabase;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_btreemap_source_in_id_order() {
        let mut map = BTreeMap::new();
        map.insert(9, terms(&["b"]));
        map.insert(2, terms(&["a"]));
        let docs = map.document_terms().unwrap();
        assert_eq!(docs.iter().map(|d| d.doc_id).collect::<Vec<_>>(), vec![2, 9]);
    }

    #[test]
    fn test_doc_terms_table() {
        let db = IndexDatabase::open_in_memory().unwrap();
        db.write(|tx| {
            assert!(DocTermsTable::open(tx, DOC_TERMS_TABLE)?.is_none());

            let table = DocTermsTable::create(tx, DOC_TERMS_TABLE)?;
            table.put(u64::MAX, &terms(&["huge"]))?;
            table.put(7, &terms(&["notes", "md"]))?;
            table.put(3, &terms(&["april8"]))?;
            table.put(7, &terms(&["notes", "txt"]))?;

            assert_eq!(table.get(7)?, Some(terms(&["notes", "txt"])));
            assert_eq!(table.get(4)?, None);

            let ids: Vec<u64> = table.document_terms()?.iter().map(|d| d.doc_id).collect();
            assert_eq!(ids, vec![3, 7, u64::MAX]);

            assert!(table.remove(3)?);
            assert!(!table.remove(3)?);
            Ok(())
        })
        .unwrap();

        let reopened = db
            .read(|tx| {
                let table = DocTermsTable::open(tx, DOC_TERMS_TABLE)?.expect("table exists");
                table.document_terms()
            })
            .unwrap();
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_put_rejects_nul_in_term() {
        let db = IndexDatabase::open_in_memory().unwrap();
        let result = db.write(|tx| {
            let table = DocTermsTable::create(tx, DOC_TERMS_TABLE)?;
            table.put(1, &terms(&["bad\0term"]))
        });
        assert!(matches!(result, Err(crate::database::DatabaseError::Codec(_))));
    }
}
