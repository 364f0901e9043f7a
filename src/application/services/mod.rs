//! Business logic services for the application layer.

pub mod short_url_builder;

pub use short_url_builder::ShortUrlBuilder;
