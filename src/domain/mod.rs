//! Domain layer containing business entities and storage contracts.
//!
//! This module defines the data model of short URL records and the
//! repository traits the allocation protocol consumes, independent of any
//! concrete storage engine.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure concerns
//! - Repository traits define contracts implemented by the infrastructure
//!   layer (see [`crate::infrastructure::persistence`])
//! - Business logic lives in [`crate::application::services`]

pub mod entities;
pub mod repositories;
