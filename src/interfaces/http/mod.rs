pub mod error;
pub mod handlers;
pub mod state;
pub mod wire;

use axum::Router;
use axum::routing::{get, post};
use state::AppState;
use std::sync::Arc;

/// Builds the service router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/webhook", post(handlers::webhook))
        .route("/createInvoiceLink", post(handlers::create_invoice_link))
        .route(
            "/reading-paid",
            get(handlers::reading_status_get).post(handlers::reading_status_post),
        )
        .route(
            "/setwebhook",
            get(handlers::set_webhook).post(handlers::set_webhook),
        )
        .with_state(state)
}
