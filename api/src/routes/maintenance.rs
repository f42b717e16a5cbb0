use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use db::models::prediction_request::Model as PredictionRequest;

use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /reset
///
/// Deletes every row in the prediction request log unconditionally and
/// confirms. Intended for test and maintenance use: a predict racing a
/// reset may land before or after the delete, and no isolation is
/// provided between the two.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": null,
///   "message": "All prediction requests have been reset"
/// }
/// ```
pub async fn reset(State(state): State<AppState>) -> Response {
    match PredictionRequest::delete_all(state.db()).await {
        Ok(deleted) => {
            tracing::info!("reset cleared {deleted} prediction requests");
            Json(ApiResponse::success(
                (),
                "All prediction requests have been reset",
            ))
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}
