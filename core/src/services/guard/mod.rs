//! Origin guard: per-origin failure counting and temporary blocks

mod origin_guard;
mod state;

#[cfg(test)]
mod tests;

pub use origin_guard::{OriginGuard, OriginPermit};
pub use state::GuardState;
