//! Unified error handling for the HTTP layer.
//!
//! Every failed request gets a JSON envelope `{error, details?, errors?}`
//! with a status that reflects who is at fault: validation and field-level
//! rejections are 4xx, remote-store trouble is 5xx. The `details` field
//! carries Shopify's own payload for diagnosis; the access token never
//! appears anywhere in a response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use callshelf_core::InvalidCustomerId;

use crate::shopify::{FieldError, ShopifyError};
use crate::sync::SyncError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from the client; no remote call was made.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Shopify rejected customer fields during a profile update.
    #[error("Customer update rejected")]
    InvalidFields(Vec<FieldError>),

    /// List synchronization failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A direct Shopify call failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),
}

impl From<InvalidCustomerId> for AppError {
    fn from(err: InvalidCustomerId) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// JSON error envelope returned with every non-2xx response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    fn message(error: String) -> Self {
        Self {
            error,
            details: None,
            errors: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Report server-side failures to Sentry
        if matches!(
            self,
            Self::Shopify(_)
                | Self::Sync(SyncError::Transport(_) | SyncError::Auth(_) | SyncError::Decode { .. })
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "request failed"
            );
        }

        let (status, body) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorBody::message(message)),
            Self::InvalidFields(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Customer update rejected".to_string(),
                    details: None,
                    errors: Some(errors),
                },
            ),
            Self::Sync(err) => sync_response(err),
            Self::Shopify(err) => shopify_response(err),
        };

        (status, Json(body)).into_response()
    }
}

fn sync_response(err: SyncError) -> (StatusCode, ErrorBody) {
    match err {
        SyncError::NotFound { .. } => (StatusCode::NOT_FOUND, ErrorBody::message(err.to_string())),
        // A corrupt stored value is our data problem, not the client's and
        // not (necessarily) Shopify's.
        SyncError::Decode { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::message(err.to_string()),
        ),
        SyncError::Auth(message) => (
            StatusCode::BAD_GATEWAY,
            ErrorBody::message(format!("Shopify authentication failed: {message}")),
        ),
        SyncError::Transport(err) => shopify_response(err),
    }
}

fn shopify_response(err: ShopifyError) -> (StatusCode, ErrorBody) {
    match err {
        ShopifyError::Unauthorized(message) => (
            StatusCode::BAD_GATEWAY,
            ErrorBody::message(format!("Shopify authentication failed: {message}")),
        ),
        ShopifyError::Api { status, detail } => (
            StatusCode::BAD_GATEWAY,
            ErrorBody {
                error: format!("Shopify API error: {status}"),
                details: Some(detail),
                errors: None,
            },
        ),
        other => (StatusCode::BAD_GATEWAY, ErrorBody::message(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use callshelf_core::{CallList, CustomerId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_bad_request_is_400() {
        assert_eq!(
            get_status(AppError::BadRequest("missing call_id".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_field_errors_are_400() {
        let err = AppError::InvalidFields(vec![FieldError {
            field: "input.email".to_string(),
            message: "Email is invalid".to_string(),
        }]);
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_is_404() {
        let err = AppError::Sync(SyncError::NotFound {
            customer: CustomerId::parse("c1").expect("valid"),
            list: CallList::Pinned,
        });
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_decode_failure_is_500() {
        let source = callshelf_core::decode_call_ids("not json").expect_err("corrupt");
        let err = AppError::Sync(SyncError::Decode {
            customer: CustomerId::parse("c1").expect("valid"),
            list: CallList::Read,
            source,
        });
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_failure_is_502() {
        let err = AppError::Sync(SyncError::Auth("rejected".to_string()));
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_transport_failure_is_502() {
        let err = AppError::Shopify(ShopifyError::Api {
            status: 503,
            detail: serde_json::Value::String("unavailable".to_string()),
        });
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }
}
