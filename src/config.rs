//! Client configuration and authentication.

use crate::secure_string::SecureString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the web-services endpoint.
    pub endpoint: String,
    /// Default site the client operates on. Injected into identifiers and
    /// asset payloads unless an operation overrides it.
    pub site_name: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether to verify TLS certificates. Release builds always verify.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Additional headers to include on every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_verify_tls() -> bool {
    true
}

impl ClientConfig {
    /// Creates a config with default timeout, TLS verification, and no
    /// extra headers.
    pub fn new(endpoint: impl Into<String>, site_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            site_name: site_name.into(),
            timeout_secs: default_timeout_secs(),
            verify_tls: default_verify_tls(),
            headers: HashMap::new(),
        }
    }
}

/// Credentials sent in the `authentication` member of every request body.
///
/// The two forms are mutually exclusive; setting one on the client replaces
/// the other. Secrets are zeroized on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authentication {
    /// API key authentication.
    ApiKey {
        #[serde(rename = "apiKey")]
        api_key: SecureString,
    },
    /// Username/password authentication.
    UsernamePassword {
        username: String,
        password: SecureString,
    },
}

impl Authentication {
    /// API key credentials. The key is trimmed, matching how the service
    /// issues keys with surrounding whitespace in exports.
    pub fn api_key(key: &str) -> Self {
        Self::ApiKey {
            api_key: SecureString::from(key.trim()),
        }
    }

    pub fn username_password(username: &str, password: &str) -> Self {
        Self::UsernamePassword {
            username: username.to_string(),
            password: SecureString::from(password),
        }
    }
}
