//! Account route handlers.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use callshelf_core::CustomerId;

use crate::error::AppError;
use crate::shopify::{Customer, CustomerUpdate, CustomerUpdateError};
use crate::state::AppState;

/// Build the account router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/update-user-info", post(update_user_info))
}

/// Request body for a profile update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateUserInfoRequest {
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Response for a successful profile update.
#[derive(Debug, Serialize)]
pub struct UpdateUserInfoResponse {
    pub success: bool,
    pub customer: Customer,
}

/// Update a customer's name and/or email.
///
/// Field-level rejections from Shopify come back as a 400 with the
/// offending fields listed; transport failures are 5xx.
///
/// # Errors
///
/// Returns an error if `customer_id` is missing, Shopify rejects a field,
/// or the remote call fails.
pub async fn update_user_info(
    State(state): State<AppState>,
    Json(body): Json<UpdateUserInfoRequest>,
) -> Result<Json<UpdateUserInfoResponse>, AppError> {
    let Some(customer_id) = &body.customer_id else {
        return Err(AppError::BadRequest("Missing customer_id".to_string()));
    };
    let customer_id = CustomerId::parse(customer_id)?;

    let update = CustomerUpdate {
        first_name: body.first_name.as_deref(),
        last_name: body.last_name.as_deref(),
        email: body.email.as_deref(),
    };

    let customer = state
        .shopify()
        .update_customer(&customer_id, update)
        .await
        .map_err(|err| match err {
            CustomerUpdateError::Fields(errors) => AppError::InvalidFields(errors),
            CustomerUpdateError::Shopify(err) => AppError::Shopify(err),
        })?;

    Ok(Json(UpdateUserInfoResponse {
        success: true,
        customer,
    }))
}
