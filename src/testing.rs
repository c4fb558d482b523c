//! Testing harness for client operations.
//!
//! Helpers to build clients over a mock transport and to script the
//! service's response envelopes.

use crate::client::Client;
use crate::config::ClientConfig;
use crate::mock::MockTransport;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Creates a test config with sensible defaults.
pub fn test_client_config() -> ClientConfig {
    ClientConfig::new("https://cms.example.edu/ws", "test-site")
}

/// Creates a client over the given mock transport, authenticated with a
/// throwaway API key.
pub fn test_client(transport: Arc<MockTransport>) -> Client {
    let mut client = Client::with_transport(test_client_config(), transport);
    client.set_auth_by_key("test-api-key");
    client
}

/// Builds a success envelope for an operation, merging in any extra payload
/// members.
pub fn success_envelope(operation: &str, extra: Value) -> Value {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), json!("true"));
    if let Value::Object(fields) = extra {
        envelope.extend(fields);
    }

    let mut response = Map::new();
    response.insert(format!("{}Return", operation), Value::Object(envelope));
    Value::Object(response)
}

/// Builds a failure envelope carrying a server message.
pub fn failure_envelope(operation: &str, message: &str) -> Value {
    json!({
        (format!("{}Return", operation)): {
            "success": "false",
            "message": message,
        }
    })
}

/// A minimal page payload, without `siteName` (the client injects it).
pub fn sample_page(name: &str) -> Value {
    json!({
        "name": name,
        "parentFolderPath": "about",
        "xhtml": "<p>content</p>",
    })
}
