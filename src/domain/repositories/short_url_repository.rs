//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for persisting short URL records.
///
/// The storage engine must enforce a uniqueness constraint on the key
/// column alone; that constraint is the only synchronization the
/// allocation protocol relies on under concurrent writers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryShortUrlRepository`] - in-memory
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Atomically inserts a new record and returns the persisted view.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if and only if the key
    /// column's uniqueness constraint rejected the insert. Any other
    /// failure is [`StoreError::Backend`].
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrlRecord, StoreError>;

    /// Returns whether a record with the given key already exists.
    ///
    /// Used as a cheap pre-filter before insert attempts; the result may
    /// be stale by the time the insert runs, so callers must still handle
    /// [`StoreError::DuplicateKey`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage failures.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
}
