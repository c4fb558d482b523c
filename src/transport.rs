//! RPC transport layer.
//!
//! [`Transport`] is the seam between the typed client and the wire: one
//! async call taking an operation name and a JSON parameter tree, returning
//! the JSON response body. [`HttpTransport`] is the production
//! implementation; [`MockTransport`](crate::mock::MockTransport) replays
//! scripted responses for tests.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Generic request/response RPC seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one operation with its parameter tree and returns the parsed
    /// response body.
    async fn call(&self, operation: &str, params: Value) -> ClientResult<Value>;

    /// The endpoint this transport talks to.
    fn endpoint(&self) -> &str;
}

/// HTTP transport: POSTs the parameter tree as JSON to
/// `{endpoint}/{operation}`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Builds a transport from client configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        // TLS verification cannot be disabled in release builds
        let verify_tls = if !config.verify_tls {
            #[cfg(debug_assertions)]
            {
                warn!(
                    endpoint = %config.endpoint,
                    "TLS certificate verification DISABLED in development mode"
                );
                false
            }
            #[cfg(not(debug_assertions))]
            {
                warn!(
                    endpoint = %config.endpoint,
                    "Attempted to disable TLS verification in a release build - request IGNORED"
                );
                true
            }
        } else {
            true
        };

        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                reqwest::header::HeaderName::try_from(key.as_str()),
                reqwest::header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, val);
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!verify_tls)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, operation: &str, params: Value) -> ClientResult<Value> {
        let url = format!("{}/{}", self.endpoint, operation);
        debug!(operation, %url, "dispatching web-services call");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(e.to_string())
                } else if e.is_connect() {
                    ClientError::ConnectionFailed(e.to_string())
                } else {
                    ClientError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestFailed(format!(
                "{} returned {}: {}",
                operation,
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "failed to parse {} response: {} - body: {}",
                operation,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let config = ClientConfig::new("https://cms.example.edu/ws", "my-site");
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let config = ClientConfig::new("https://cms.example.edu/ws/", "my-site");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.endpoint(), "https://cms.example.edu/ws");
    }
}
