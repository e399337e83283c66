use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/admin/add-user`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AddUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 254))]
    pub username: String,
    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: String,
}

/// Successful provisioning: the new identifier and its first code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUserResponse {
    pub success: bool,
    pub message: String,
    pub identifier: String,
    pub code: String,
}

impl AddUserResponse {
    pub fn new(identifier: String, code: String) -> Self {
        Self {
            success: true,
            message: "User added successfully".to_string(),
            identifier,
            code,
        }
    }
}
