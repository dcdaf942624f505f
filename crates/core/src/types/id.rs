//! Newtype IDs for type-safe entity references.
//!
//! Shopify owns both identifier spaces; we treat them as opaque strings.
//! `CustomerId` is validated at construction so every downstream operation
//! can assume a usable identifier, while `CallId` stays unvalidated because
//! call IDs also arrive from the remote store as stored data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`CustomerId`] from request input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCustomerId {
    /// The identifier was missing or blank.
    #[error("customer id must not be empty")]
    Empty,
}

/// A Shopify customer identifier.
///
/// Customers are never created or destroyed by this service; the ID is an
/// opaque string owned by Shopify (numeric in practice, but nothing here
/// depends on that).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Parse a customer ID from request input, trimming surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCustomerId::Empty`] if the input is empty or
    /// whitespace-only. Validation happens here so no remote call is ever
    /// made with a blank identifier.
    pub fn parse(input: &str) -> Result<Self, InvalidCustomerId> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(InvalidCustomerId::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque content item identifier (a recorded call).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Create a call ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_parse_valid() {
        let id = CustomerId::parse("8412398572").expect("valid id");
        assert_eq!(id.as_str(), "8412398572");
    }

    #[test]
    fn test_customer_id_parse_trims_whitespace() {
        let id = CustomerId::parse("  8412398572 ").expect("valid id");
        assert_eq!(id.as_str(), "8412398572");
    }

    #[test]
    fn test_customer_id_parse_empty() {
        assert_eq!(CustomerId::parse(""), Err(InvalidCustomerId::Empty));
        assert_eq!(CustomerId::parse("   "), Err(InvalidCustomerId::Empty));
    }

    #[test]
    fn test_customer_id_display() {
        let id = CustomerId::parse("123").expect("valid id");
        assert_eq!(id.to_string(), "123");
    }

    #[test]
    fn test_call_id_roundtrip_serde() {
        let id = CallId::new("call_42");
        let json = serde_json::to_string(&id).expect("serializes");
        assert_eq!(json, "\"call_42\"");
        let back: CallId = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, id);
    }

    #[test]
    fn test_call_id_equality() {
        assert_eq!(CallId::from("a"), CallId::new("a"));
        assert_ne!(CallId::from("a"), CallId::from("b"));
    }
}
