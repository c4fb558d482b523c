//! Credential string with automatic memory zeroization.
//!
//! API keys and passwords travel in every request body, so they live in the
//! client for its whole lifetime. `SecureString` keeps them out of logs and
//! clears the backing memory when the value is dropped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// A string whose contents are zeroized on drop.
///
/// `Debug` and `Display` are redacted; the value is only reachable through
/// [`SecureString::expose_secret`]. Serialization writes the real value,
/// since credentials must reach the wire.
#[derive(Clone)]
pub struct SecureString(Zeroizing<String>);

impl SecureString {
    pub fn new(s: String) -> Self {
        Self(Zeroizing::new(s))
    }

    /// Exposes the secret for use. Avoid copying the returned slice; copies
    /// are not zeroized.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl Default for SecureString {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time comparison to avoid leaking prefix length
        use subtle::ConstantTimeEq;
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for SecureString {}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecureString::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_secret() {
        let secret = SecureString::new("my-api-key".to_string());
        assert_eq!(secret.expose_secret(), "my-api-key");
    }

    #[test]
    fn test_from_str() {
        let secret: SecureString = "my-api-key".into();
        assert_eq!(secret.expose_secret(), "my-api-key");
        assert!(!secret.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SecureString::default().is_empty());
    }

    #[test]
    fn test_debug_and_display_redacted() {
        let secret = SecureString::new("super-secret".to_string());
        assert!(!format!("{:?}", secret).contains("super-secret"));
        assert!(!format!("{}", secret).contains("super-secret"));
    }

    #[test]
    fn test_equality() {
        let a = SecureString::from("same");
        let b = SecureString::from("same");
        let c = SecureString::from("different");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_serialize_round_trip() {
        let original = SecureString::from("wire-credential");
        let serialized = serde_json::to_string(&original).unwrap();
        assert!(serialized.contains("wire-credential"));

        let deserialized: SecureString = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }
}
