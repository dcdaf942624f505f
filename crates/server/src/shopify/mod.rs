//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! Two surfaces of the Admin API are used:
//!
//! - the REST metafield endpoints, which hold the per-customer call lists
//!   (lookup by namespace/key, create, update-by-id);
//! - the GraphQL endpoint, for the `customerUpdate` mutation.
//!
//! The access token is attached to every request as
//! `X-Shopify-Access-Token` and is never logged or echoed in errors. All
//! requests carry a bounded timeout; a timeout surfaces as a retryable
//! transport error. Nothing here retries automatically.

mod client;
mod customers;
mod types;

pub use client::AdminClient;
pub use customers::{CustomerUpdate, CustomerUpdateError};
pub use types::{Customer, FieldError, Metafield};

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (network error or timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify returned a non-2xx response.
    #[error("Shopify API error: {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by Shopify, for diagnosis.
        detail: serde_json::Value,
    },

    /// GraphQL query returned top-level errors.
    #[error("GraphQL errors: {0}")]
    GraphQL(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Shopify rejected the access token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ShopifyError::Api {
            status: 422,
            detail: serde_json::json!({"errors": "Unprocessable"}),
        };
        assert_eq!(err.to_string(), "Shopify API error: 422");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_unauthorized_error() {
        let err = ShopifyError::Unauthorized("invalid access token".to_string());
        assert_eq!(err.to_string(), "Unauthorized: invalid access token");
    }
}
