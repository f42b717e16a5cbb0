//! HTTP route entry point.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/api` → prediction and per-customer request-count endpoints
//! - `/reset` → clears the prediction request log (maintenance-only; left
//!   unauthenticated to match the service contract — deployments that need
//!   to restrict it should do so in front of the service)

use axum::{Router, routing::post};

use crate::state::AppState;

pub mod health;
pub mod maintenance;
pub mod predictions;

/// Builds the complete application router.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/api", predictions::predictions_routes())
        .route("/reset", post(maintenance::reset))
        .with_state(app_state)
}
