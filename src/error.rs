//! Error types for configuration, validation, and storage.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by the builder and the allocation protocol.
///
/// Validation errors are raised eagerly at the offending setter and leave
/// builder state untouched. [`ShortenerError::Storage`] carries storage
/// faults that are not duplicate-key conflicts; conflicts are retried
/// inside the allocation loop and never reach the caller.
#[derive(Debug, Error)]
pub enum ShortenerError {
    /// Destination URL does not start with `http://` or `https://`.
    #[error("destination URL '{url}' must start with http:// or https://")]
    InvalidDestination { url: String },

    /// Activation or deactivation time is in the past, or the window is
    /// inverted.
    #[error("invalid activation window: {reason}")]
    InvalidTemporalValue { reason: String },

    /// Redirect status code outside the redirection class.
    #[error("redirect status code {code} is outside 300..=399")]
    InvalidRedirectCode { code: u16 },

    /// Explicit key escaped to an empty string.
    #[error("explicit key must not be empty")]
    InvalidKey,

    /// `create` was called before a destination URL was set.
    #[error("no destination URL has been set")]
    MissingDestination,

    /// Process-wide configuration failed validation at builder construction.
    #[error("invalid process configuration")]
    InvalidEnvironment(#[source] anyhow::Error),

    /// A storage fault other than a duplicate-key conflict.
    #[error("storage failure during key allocation")]
    Storage(#[source] StoreError),
}

impl ShortenerError {
    pub(crate) fn past_time(field: &str, value: DateTime<Utc>) -> Self {
        Self::InvalidTemporalValue {
            reason: format!("{field} time {value} is in the past"),
        }
    }

    pub(crate) fn inverted_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::InvalidTemporalValue {
            reason: format!("deactivation time {end} precedes activation time {start}"),
        }
    }
}

/// Errors reported by [`crate::domain::repositories::ShortUrlRepository`]
/// implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The uniqueness constraint on the key column rejected the insert.
    ///
    /// Expected under concurrent allocation; absorbed by the allocation
    /// loop and never surfaced to callers.
    #[error("key '{key}' already exists")]
    DuplicateKey { key: String },

    /// Any other backend failure. Never retried.
    #[error("storage backend failure")]
    Backend(#[source] anyhow::Error),
}

impl StoreError {
    /// Returns true for the narrow conflict signal the allocation loop
    /// retries on.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_predicate() {
        let dup = StoreError::DuplicateKey {
            key: "abc123".to_string(),
        };
        assert!(dup.is_duplicate_key());

        let backend = StoreError::Backend(anyhow::anyhow!("connection refused"));
        assert!(!backend.is_duplicate_key());
    }

    #[test]
    fn test_temporal_error_messages() {
        let err = ShortenerError::past_time("activation", Utc::now());
        assert!(err.to_string().contains("activation window"));

        let now = Utc::now();
        let err = ShortenerError::inverted_window(now, now);
        assert!(matches!(err, ShortenerError::InvalidTemporalValue { .. }));
    }
}
