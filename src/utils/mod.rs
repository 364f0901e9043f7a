//! Utility modules.
//!
//! - [`key_generator`] - Candidate key generation for short URLs

pub mod key_generator;

pub use key_generator::{KeyGenerator, RandomKeyGenerator};

#[cfg(test)]
pub use key_generator::MockKeyGenerator;
