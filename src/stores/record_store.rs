//! Generic identifier-keyed record storage.
//!
//! Records live in a `BTreeMap` behind a tokio `RwLock`:
//! - Reads (`get`, `values`) share the lock and return owned copies, so a
//!   returned snapshot never changes under later writes.
//! - Writes take the lock exclusively. Read-modify-write callers go through
//!   [`RecordStore::replace_with`] so the read and the write happen under one
//!   guard.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::dto::Record;
use crate::{Error, Identifier};

pub struct RecordStore<R> {
    records: RwLock<BTreeMap<Identifier, R>>,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builds a store from previously saved records. Later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (*record.id(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Unconditional upsert.
    pub async fn insert(&self, id: Identifier, record: R) {
        self.records.write().await.insert(id, record);
    }

    /// Inserts a record under a fresh key.
    /// Returns an error, leaving the store untouched, if the key is already taken.
    pub async fn insert_new(&self, id: Identifier, record: R) -> Result<(), Error> {
        self.insert_new_within(id, record, None).await
    }

    /// Like [`RecordStore::insert_new`], but also rejects the record once the
    /// store holds `capacity` records. Both checks run under the write lock.
    pub async fn insert_new_within(
        &self,
        id: Identifier,
        record: R,
        capacity: Option<usize>,
    ) -> Result<(), Error> {
        let mut records = self.records.write().await;
        if let Some(capacity) = capacity {
            if records.len() >= capacity {
                return Err(Error::NoAvailableRooms { capacity });
            }
        }
        match records.entry(id) {
            Entry::Occupied(_) => Err(Error::DuplicateIdentifier(id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    pub async fn get(&self, id: &Identifier) -> Option<R> {
        self.records.read().await.get(id).cloned()
    }

    /// Point-in-time copy of every record, in ascending key order.
    pub async fn values(&self) -> Vec<R> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Atomically reads the record at `id` and optionally replaces it.
    ///
    /// `f` sees the current record (if any) and returns the replacement to
    /// store (if any) together with a result for the caller. No other writer
    /// can interleave between the read and the write.
    pub async fn replace_with<F, T>(&self, id: &Identifier, f: F) -> T
    where
        F: FnOnce(Option<&R>) -> (Option<R>, T),
    {
        let mut records = self.records.write().await;
        let (replacement, result) = f(records.get(id));
        if let Some(record) = replacement {
            records.insert(*id, record);
        }
        result
    }
}
