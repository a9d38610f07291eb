//! Identity tokens for collection entries
//!
//! An identity is the sole equality key inside a staged collection: two
//! entries with equal identities are the same entry regardless of their
//! other attributes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token that uniquely identifies an entry within a collection
///
/// Identities are caller-provided and accepted as-is: no normalization,
/// no validation, no restriction on the underlying string. An identity
/// must stay stable for as long as the entry is held by a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from an existing token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate a fresh random identity using UUIDv7
    ///
    /// Convenience for consumers minting identifiers for newly created
    /// entities before staging them into a collection.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identity and return the underlying token
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Identity {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Identity {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
