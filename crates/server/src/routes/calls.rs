//! Call list route handlers.
//!
//! All four mutations and both reads funnel into the same synchronizer;
//! the handlers differ only in which list they touch and whether they add,
//! remove, or read.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use callshelf_core::{CallId, CallList, CustomerId};

use crate::error::AppError;
use crate::state::AppState;

/// Build the call-list router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/mark-call-read", post(mark_call_read))
        .route("/api/get-read-calls", get(get_read_calls))
        .route("/api/pin-call", post(pin_call))
        .route("/api/unpin-call", post(unpin_call))
        .route("/api/get-pinned-calls", get(get_pinned_calls))
}

/// Request body for the list mutations.
#[derive(Debug, Deserialize)]
pub struct CallActionRequest {
    pub customer_id: Option<String>,
    pub call_id: Option<String>,
}

/// Response for the list mutations.
#[derive(Debug, Serialize)]
pub struct CallActionResponse {
    pub success: bool,
    pub updated: Vec<CallId>,
}

/// Query parameters for the list reads.
#[derive(Debug, Deserialize)]
pub struct CallListQuery {
    pub customer_id: Option<String>,
}

/// Response for the list reads.
#[derive(Debug, Serialize)]
pub struct CallListResponse {
    pub call_ids: Vec<CallId>,
}

/// Mark a call as read.
///
/// # Errors
///
/// Returns an error if the identifiers are missing or the remote update
/// fails.
pub async fn mark_call_read(
    State(state): State<AppState>,
    Json(body): Json<CallActionRequest>,
) -> Result<Json<CallActionResponse>, AppError> {
    add(&state, CallList::Read, &body).await
}

/// List the calls a customer has marked as read.
///
/// # Errors
///
/// Returns an error if `customer_id` is missing or the remote read fails.
pub async fn get_read_calls(
    State(state): State<AppState>,
    Query(query): Query<CallListQuery>,
) -> Result<Json<CallListResponse>, AppError> {
    fetch(&state, CallList::Read, &query).await
}

/// Pin a call.
///
/// # Errors
///
/// Returns an error if the identifiers are missing or the remote update
/// fails.
pub async fn pin_call(
    State(state): State<AppState>,
    Json(body): Json<CallActionRequest>,
) -> Result<Json<CallActionResponse>, AppError> {
    add(&state, CallList::Pinned, &body).await
}

/// Unpin a call.
///
/// Unpinning from a customer with no pinned-calls record at all is 404;
/// unpinning a call that is not pinned succeeds and changes nothing.
///
/// # Errors
///
/// Returns an error if the identifiers are missing, no record exists, or
/// the remote update fails.
pub async fn unpin_call(
    State(state): State<AppState>,
    Json(body): Json<CallActionRequest>,
) -> Result<Json<CallActionResponse>, AppError> {
    let (customer, call) = parse_action(&body)?;
    let updated = state
        .lists()
        .remove_from_list(&customer, CallList::Pinned, &call)
        .await?;
    Ok(Json(CallActionResponse {
        success: true,
        updated,
    }))
}

/// List the calls a customer has pinned.
///
/// # Errors
///
/// Returns an error if `customer_id` is missing or the remote read fails.
pub async fn get_pinned_calls(
    State(state): State<AppState>,
    Query(query): Query<CallListQuery>,
) -> Result<Json<CallListResponse>, AppError> {
    fetch(&state, CallList::Pinned, &query).await
}

async fn add(
    state: &AppState,
    list: CallList,
    body: &CallActionRequest,
) -> Result<Json<CallActionResponse>, AppError> {
    let (customer, call) = parse_action(body)?;
    let updated = state.lists().add_to_list(&customer, list, &call).await?;
    Ok(Json(CallActionResponse {
        success: true,
        updated,
    }))
}

async fn fetch(
    state: &AppState,
    list: CallList,
    query: &CallListQuery,
) -> Result<Json<CallListResponse>, AppError> {
    let customer = parse_customer(query.customer_id.as_deref())?;
    let call_ids = state.lists().fetch_list(&customer, list).await?;
    Ok(Json(CallListResponse { call_ids }))
}

fn parse_action(body: &CallActionRequest) -> Result<(CustomerId, CallId), AppError> {
    let (Some(customer_id), Some(call_id)) = (&body.customer_id, &body.call_id) else {
        return Err(AppError::BadRequest(
            "Missing customer_id or call_id".to_string(),
        ));
    };

    let customer = CustomerId::parse(customer_id)?;

    let call_id = call_id.trim();
    if call_id.is_empty() {
        return Err(AppError::BadRequest("call_id must not be empty".to_string()));
    }

    Ok((customer, CallId::from(call_id)))
}

fn parse_customer(customer_id: Option<&str>) -> Result<CustomerId, AppError> {
    let Some(customer_id) = customer_id else {
        return Err(AppError::BadRequest("Missing customer_id".to_string()));
    };
    Ok(CustomerId::parse(customer_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_valid() {
        let body = CallActionRequest {
            customer_id: Some("8412398572".to_string()),
            call_id: Some("call_1".to_string()),
        };
        let (customer, call) = parse_action(&body).expect("parses");
        assert_eq!(customer.as_str(), "8412398572");
        assert_eq!(call.as_str(), "call_1");
    }

    #[test]
    fn test_parse_action_missing_fields() {
        let body = CallActionRequest {
            customer_id: None,
            call_id: Some("call_1".to_string()),
        };
        assert!(matches!(
            parse_action(&body),
            Err(AppError::BadRequest(_))
        ));

        let body = CallActionRequest {
            customer_id: Some("8412398572".to_string()),
            call_id: None,
        };
        assert!(matches!(
            parse_action(&body),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_action_blank_values() {
        let body = CallActionRequest {
            customer_id: Some("  ".to_string()),
            call_id: Some("call_1".to_string()),
        };
        assert!(matches!(
            parse_action(&body),
            Err(AppError::BadRequest(_))
        ));

        let body = CallActionRequest {
            customer_id: Some("8412398572".to_string()),
            call_id: Some("".to_string()),
        };
        assert!(matches!(
            parse_action(&body),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_action_response_shape() {
        let response = CallActionResponse {
            success: true,
            updated: vec![CallId::from("call_1")],
        };
        let json = serde_json::to_value(&response).expect("serializes");
        assert_eq!(json["success"], true);
        assert_eq!(json["updated"][0], "call_1");
    }

    #[test]
    fn test_list_response_shape() {
        let response = CallListResponse {
            call_ids: vec![CallId::from("call_1"), CallId::from("call_2")],
        };
        let json = serde_json::to_value(&response).expect("serializes");
        assert_eq!(json["call_ids"], serde_json::json!(["call_1", "call_2"]));
    }
}
