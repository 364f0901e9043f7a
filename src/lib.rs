//! # Shortling
//!
//! Short-URL record construction with race-safe unique key allocation.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Record entities and repository traits
//! - **Application Layer** ([`application`]) - The configuration builder and
//!   the key allocation protocol
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL and
//!   in-memory repository implementations
//!
//! ## Key allocation
//!
//! [`application::services::ShortUrlBuilder::create`] drives an optimistic
//! generate-insert-retry loop. Candidate keys come from a
//! [`utils::key_generator::KeyGenerator`] with no uniqueness guarantee;
//! uniqueness is established solely by the storage engine's atomic
//! constraint on the key column. Duplicate-key conflicts are absorbed and
//! retried, any other storage fault propagates unchanged. The loop is
//! lock-free from the caller's perspective: concurrent creators never
//! block each other.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shortling::config::Config;
//! use shortling::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = shortling::config::load_from_env()?;
//! let repository = Arc::new(MemoryShortUrlRepository::new());
//!
//! let mut builder = ShortUrlBuilder::new(config, repository, RandomKeyGenerator)?;
//! let record = builder
//!     .destination("https://example.com/docs")?
//!     .single_use(true)
//!     .create()
//!     .await?;
//!
//! println!("{} -> {}", record.public_url, record.destination_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Process-wide defaults (public base URL, https enforcement, tracking
//! defaults) are loaded from environment variables via [`config::Config`]
//! and injected into the builder at construction. See [`config`] for
//! available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::{ShortenerError, StoreError};

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::ShortUrlBuilder;
    pub use crate::config::Config;
    pub use crate::domain::entities::{NewShortUrl, ShortUrlRecord, TrackingFlags, TrackingOverrides};
    pub use crate::domain::repositories::ShortUrlRepository;
    pub use crate::error::{ShortenerError, StoreError};
    pub use crate::infrastructure::persistence::{MemoryShortUrlRepository, PgShortUrlRepository};
    pub use crate::utils::key_generator::{KeyGenerator, RandomKeyGenerator};
}
