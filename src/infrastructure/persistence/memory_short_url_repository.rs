//! In-memory implementation of the short URL repository.
//!
//! Stores all records in RAM behind an `RwLock`, enforcing the same
//! key-uniqueness contract as the PostgreSQL implementation. Mostly
//! intended for tests and embedded use, as nothing is persisted between
//! restarts.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::StoreError;

/// In-memory short URL store keyed by the unique key column.
#[derive(Debug, Default)]
pub struct MemoryShortUrlRepository {
    records: RwLock<HashMap<String, ShortUrlRecord>>,
    next_id: AtomicI64,
}

impl MemoryShortUrlRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().expect("records lock is poisoned").len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the record stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<ShortUrlRecord> {
        self.records
            .read()
            .expect("records lock is poisoned")
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ShortUrlRepository for MemoryShortUrlRepository {
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrlRecord, StoreError> {
        let mut records = self.records.write().expect("records lock is poisoned");

        // The uniqueness check and the insert happen under one write
        // lock, matching the atomicity of a database constraint.
        if records.contains_key(&new_short_url.key) {
            return Err(StoreError::DuplicateKey {
                key: new_short_url.key,
            });
        }

        let record = ShortUrlRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            key: new_short_url.key.clone(),
            destination_url: new_short_url.destination_url,
            public_url: new_short_url.public_url,
            redirect_status: new_short_url.redirect_status,
            single_use: new_short_url.single_use,
            activate_at: new_short_url.activate_at,
            deactivate_at: new_short_url.deactivate_at,
            tracking: new_short_url.tracking,
            created_at: Utc::now(),
        };

        records.insert(new_short_url.key, record.clone());
        Ok(record)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .records
            .read()
            .expect("records lock is poisoned")
            .contains_key(key))
    }
}
