//! Application layer implementing the record construction protocol.
//!
//! Orchestrates domain operations by coordinating configuration defaults,
//! key generation, and repository calls.
//!
//! # Available Services
//!
//! - [`services::short_url_builder::ShortUrlBuilder`] - Fluent record
//!   configuration and unique key allocation

pub mod services;
