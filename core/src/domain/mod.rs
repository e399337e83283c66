//! Domain layer containing business entities and the snapshot codec.

pub mod entities;
pub mod snapshot;

// Re-export commonly used domain types
pub use entities::{BlockList, OriginBlock, Record, IDENTIFIER_LENGTH};
