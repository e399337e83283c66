pub mod admin_auth;
pub mod origin;
pub mod security;

pub use admin_auth::is_authorized;
pub use origin::client_origin;
pub use security::security_headers;
