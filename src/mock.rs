//! Mock transport for testing.

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

/// One recorded transport call: the operation name and the parameter tree
/// the client marshaled for it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub params: Value,
}

/// Transport that records every call and replays scripted responses.
///
/// Responses are queued per operation and consumed in order; a call with no
/// scripted response fails, so tests notice unexpected traffic.
#[derive(Default)]
pub struct MockTransport {
    responses: RwLock<HashMap<String, VecDeque<ClientResult<Value>>>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response body for the given operation.
    pub async fn enqueue(&self, operation: &str, response: Value) {
        self.responses
            .write()
            .await
            .entry(operation.to_string())
            .or_default()
            .push_back(Ok(response));
    }

    /// Queues a transport-level failure for the given operation.
    pub async fn enqueue_error(&self, operation: &str, error: ClientError) {
        self.responses
            .write()
            .await
            .entry(operation.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// All calls made so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// The most recent call, if any.
    pub async fn last_call(&self) -> Option<RecordedCall> {
        self.calls.read().await.last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, operation: &str, params: Value) -> ClientResult<Value> {
        self.calls.write().await.push(RecordedCall {
            operation: operation.to_string(),
            params,
        });

        self.responses
            .write()
            .await
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(ClientError::InvalidRequest(format!(
                    "no scripted response for operation '{}'",
                    operation
                )))
            })
    }

    fn endpoint(&self) -> &str {
        "mock://wcms"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order() {
        let transport = MockTransport::new();
        transport.enqueue("read", json!({"first": 1})).await;
        transport.enqueue("read", json!({"second": 2})).await;

        let first = transport.call("read", json!({})).await.unwrap();
        let second = transport.call("read", json!({})).await.unwrap();
        assert_eq!(first, json!({"first": 1}));
        assert_eq!(second, json!({"second": 2}));
    }

    #[tokio::test]
    async fn test_records_calls() {
        let transport = MockTransport::new();
        transport.enqueue("delete", json!({})).await;

        transport
            .call("delete", json!({"identifier": "x"}))
            .await
            .unwrap();

        let calls = transport.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, "delete");
        assert_eq!(calls[0].params, json!({"identifier": "x"}));
    }

    #[tokio::test]
    async fn test_unscripted_call_fails() {
        let transport = MockTransport::new();
        let err = transport.call("copy", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("no scripted response"));
    }

    #[tokio::test]
    async fn test_replays_errors() {
        let transport = MockTransport::new();
        transport
            .enqueue_error("read", ClientError::Timeout("deadline elapsed".to_string()))
            .await;

        let err = transport.call("read", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
    }
}
