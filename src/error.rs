//! Error types for the client.
//!
//! Server rejections, transport failures, and local validation failures all
//! normalize into a single [`ClientError`] enum.

use thiserror::Error;

/// Marker the service embeds in the rejection message when a read targets an
/// asset that does not exist.
const NO_SUCH_ASSET_MARKER: &str = "no_such_asset_msg";

/// Errors that can occur in client operations.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// The service processed the call but reported `success` != "true".
    /// Carries the server-provided message verbatim.
    #[error("{operation} rejected by the service: {message}")]
    Rejected { operation: String, message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}'s container type is not supported yet")]
    UnsupportedContainerType(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// True when this is a service rejection whose message indicates the
    /// requested asset does not exist. The marker match is case-insensitive.
    pub fn is_no_such_asset(&self) -> bool {
        match self {
            Self::Rejected { message, .. } => message
                .to_ascii_lowercase()
                .contains(NO_SUCH_ASSET_MARKER),
            _ => false,
        }
    }

    /// The server-provided message for a rejection, if this is one.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}
