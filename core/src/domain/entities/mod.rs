//! Domain entities representing core business objects.

pub mod origin_block;
pub mod record;


// Re-export commonly used types
pub use origin_block::{BlockList, OriginBlock};
pub use record::{Record, IDENTIFIER_LENGTH};
