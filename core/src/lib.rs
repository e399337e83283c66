//! # RotaCode Core
//!
//! Core business logic and domain layer for the RotaCode verification service.
//! This crate contains the record entity and snapshot codec, the record store
//! and block-list repository interfaces, the code rotation engine, the origin
//! guard, and the error types that the infrastructure and API crates build on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
