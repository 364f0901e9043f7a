//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortUrlRecord`] - A persisted short URL mapping
//! - [`NewShortUrl`] - Fully resolved input for creating a record
//! - [`TrackingOverrides`] / [`TrackingFlags`] - Per-visit tracking
//!   dimensions before and after default resolution
//!
//! Entities are plain data structures; creation logic lives in
//! [`crate::application::services::ShortUrlBuilder`].

pub mod short_url;

pub use short_url::{NewShortUrl, ShortUrlRecord, TrackingFlags, TrackingOverrides};
