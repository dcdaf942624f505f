//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Service banner
//! GET  /health                  - Health check
//!
//! # Call lists
//! POST /api/mark-call-read      - Mark a call as read
//! GET  /api/get-read-calls      - List read calls for a customer
//! POST /api/pin-call            - Pin a call
//! POST /api/unpin-call          - Unpin a call
//! GET  /api/get-pinned-calls    - List pinned calls for a customer
//!
//! # Account
//! POST /api/update-user-info    - Update customer name/email
//! ```

pub mod account;
pub mod calls;

use axum::Router;

use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new().merge(calls::router()).merge(account::router())
}
