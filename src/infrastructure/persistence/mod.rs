//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgShortUrlRepository`] - PostgreSQL storage with an atomic
//!   uniqueness constraint on the key column
//! - [`MemoryShortUrlRepository`] - in-memory storage for tests and
//!   embedded use

pub mod memory_short_url_repository;
pub mod pg_short_url_repository;

pub use memory_short_url_repository::MemoryShortUrlRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
