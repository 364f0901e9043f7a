//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod persistence;
