use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, activate_loan, create_loan, decline_loan, get_catalog_availability, get_loan_by_id,
    register_interest, return_loan, withdraw_interest,
};

/// Creates the API router with all rental endpoints
///
/// Loan lifecycle (Write operations):
/// - POST /loans - Request a loan
/// - POST /loans/:id/activate - Activate a requested loan
/// - POST /loans/:id/decline - Decline a requested loan
/// - POST /loans/:id/return - Return a loaned item
///
/// Reservation (Write operations):
/// - POST /catalog/:id/interest - Register interest in a catalog entry
/// - DELETE /catalog/:id/interest/:member_id - Withdraw interest
///
/// Query endpoints (Read operations):
/// - GET /loans/:id - Get loan details
/// - GET /catalog/:id/availability - Derived catalog-level availability
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Loan lifecycle
        .route("/loans", post(create_loan))
        .route("/loans/:id", get(get_loan_by_id))
        .route("/loans/:id/activate", post(activate_loan))
        .route("/loans/:id/decline", post(decline_loan))
        .route("/loans/:id/return", post(return_loan))
        // Reservation
        .route("/catalog/:id/interest", post(register_interest))
        .route("/catalog/:id/interest/:member_id", delete(withdraw_interest))
        .route("/catalog/:id/availability", get(get_catalog_availability))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
