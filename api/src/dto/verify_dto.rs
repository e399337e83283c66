use serde::{Deserialize, Serialize};

/// Body of `POST /api/verify`
///
/// Missing fields deserialize as empty strings so that the handler, not the
/// JSON extractor, decides how an incomplete request is answered.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub code: String,
}

impl std::fmt::Debug for VerifyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyRequest")
            .field("email", &rc_shared::validation::mask_email(&self.email))
            .field("identifier", &self.identifier)
            .field("code", &"<redacted>")
            .finish()
    }
}
