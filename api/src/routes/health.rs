use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::state::AppState;

/// Builds the `/health` route group.
///
/// A single `GET /health` endpoint useful for uptime checks, load balancers,
/// or deployment health monitoring.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Always answers `200 OK` with the literal JSON string `"healthy"`. No
/// side effects; succeeds whether or not a model is loaded.
async fn health_check() -> impl IntoResponse {
    Json("healthy")
}

#[cfg(test)]
mod tests {
    use super::health_check;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use serde_json::Value;

    #[tokio::test]
    async fn health_check_returns_healthy_json() {
        let response = health_check().await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, "healthy");
    }
}
