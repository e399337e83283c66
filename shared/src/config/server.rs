//! Server configuration module

use super::{non_blank, parse_or};
use crate::errors::ConfigResult;

/// HTTP server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    pub workers: usize,

    /// Take the client origin from `X-Forwarded-For` / `Forwarded` instead of
    /// the socket peer address. Only safe behind a trusted reverse proxy.
    pub trust_proxy_headers: bool,

    /// Bearer token guarding the admin provisioning endpoint
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 3000,
            workers: 0,
            trust_proxy_headers: false,
            admin_token: None,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("workers", &self.workers)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: non_blank(lookup, "SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup, "SERVER_PORT", defaults.port)?,
            workers: parse_or(lookup, "SERVER_WORKERS", defaults.workers)?,
            trust_proxy_headers: parse_or(lookup, "TRUST_PROXY_HEADERS", false)?,
            admin_token: non_blank(lookup, "ADMIN_TOKEN"),
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
