//! HTTP route handlers
//!
//! - `verify` - code verification and rotation
//! - `admin` - record provisioning
//! - `health` - liveness probe

pub mod admin;
pub mod health;
pub mod verify;

use std::sync::Arc;

use rc_core::{BlockListRepository, Notifier, RecordRepository, VerificationService};

/// Application state that holds shared services
pub struct AppState<R, B, N>
where
    R: RecordRepository + ?Sized,
    B: BlockListRepository + ?Sized,
    N: Notifier + ?Sized,
{
    pub verification_service: Arc<VerificationService<R, B, N>>,
    /// Take the client origin from proxy headers
    pub trust_proxy_headers: bool,
    /// Bearer token required by the admin endpoints
    pub admin_token: Option<String>,
}
