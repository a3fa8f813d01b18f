//! In-process document store for tests and tooling.
//!
//! Honors the same filter semantics, insertion order and `unique` field
//! declarations as the SQLite store. It does not check references between
//! collections; services do that before writing.

use super::{Collection, Document, Filter, Record, Store, StoreError, StoreResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// Single-threaded store backed by per-collection vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RefCell<HashMap<Collection, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held by `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .borrow()
            .get(&collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.borrow().values().all(Vec::is_empty)
    }
}

impl Store for MemoryStore {
    fn insert<D: Document>(&self, document: &D) -> StoreResult<()> {
        let record = document.to_record();
        let mut collections = self.collections.borrow_mut();
        let records = collections.entry(D::COLLECTION).or_default();

        for spec in D::FIELDS.iter().filter(|spec| spec.unique) {
            let candidate = record.get(spec.name);
            if records
                .iter()
                .any(|existing| candidate.is_some() && existing.get(spec.name) == candidate)
            {
                return Err(StoreError::UniqueViolation {
                    collection: D::COLLECTION,
                    field: spec.name.to_string(),
                });
            }
        }

        records.push(record);
        Ok(())
    }

    fn find<D: Document>(&self, filter: &Filter) -> StoreResult<Vec<D>> {
        filter.check_against::<D>()?;
        let collections = self.collections.borrow();
        let Some(records) = collections.get(&D::COLLECTION) else {
            return Ok(Vec::new());
        };

        records
            .iter()
            .filter(|record| filter.matches(record))
            .map(D::from_record)
            .collect()
    }
}
