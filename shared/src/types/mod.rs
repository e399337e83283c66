//! Type definitions shared by the HTTP layer
//!
//! - `response` - response envelopes and health checks

pub mod response;

pub use response::{HealthResponse, StatusResponse};
