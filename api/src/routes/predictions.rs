//! Prediction serving and request tracking.
//!
//! `POST /api/predict` scores a customer's trailing 7-day activity features
//! against the loaded regression model and logs the interaction;
//! `GET /api/requests/{customer_id}` reports how many times a customer has
//! been scored.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use db::models::prediction_request::Model as PredictionRequest;

use crate::response::ApiResponse;
use crate::state::AppState;

pub fn predictions_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/requests/{customer_id}", get(count_requests))
}

#[derive(Debug, Deserialize)]
pub struct PredictBody {
    pub id: i64,
    pub recency_7: i32,
    pub frequency_7: i32,
    pub monetary_7: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: i64,
    pub monetary_30: f64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub id: i64,
    pub count: u64,
}

/// POST /api/predict
///
/// Predicts a customer's monetary value over the next 30 days and appends
/// one row to the request log.
///
/// ### Request Body
/// ```json
/// { "id": 1234, "recency_7": 1, "frequency_7": 1, "monetary_7": 8.5 }
/// ```
///
/// ### Responses
/// - `200 OK` → `{ "id": 1234, "monetary_30": 29.0 }` — the prediction,
///   rounded to 2 decimals; the same value is persisted.
/// - `422 Unprocessable Entity` — missing or mistyped field (the JSON
///   extractor rejects the body before this handler runs; nothing is
///   persisted).
/// - `503 Service Unavailable` — no model artifact was loaded at startup.
/// - `500 Internal Server Error` — the log row could not be written; the
///   prediction does not count as served.
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictBody>,
) -> Response {
    let Some(model) = state.model() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::error(
                "Model not available. Please train the model first.",
            )),
        )
            .into_response();
    };

    // Fixed feature order: (recency_7, frequency_7, monetary_7).
    let features = [
        f64::from(body.recency_7),
        f64::from(body.frequency_7),
        body.monetary_7,
    ];
    let prediction = round2(model.predict(&features));

    // The row and the response carry the same rounded value; if the write
    // fails the request fails with it.
    match PredictionRequest::create(
        state.db(),
        body.id,
        body.recency_7,
        body.frequency_7,
        body.monetary_7,
        prediction,
    )
    .await
    {
        Ok(_) => Json(PredictResponse {
            id: body.id,
            monetary_30: prediction,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("failed to log prediction for customer {}: {e}", body.id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
            )
                .into_response()
        }
    }
}

/// GET /api/requests/{customer_id}
///
/// Number of predictions served for this customer. Unknown customers are
/// not an error; their count is 0.
///
/// ### Responses
/// - `200 OK` → `{ "id": 1234, "count": 1 }`
pub async fn count_requests(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Response {
    match PredictionRequest::count_for_customer(state.db(), customer_id).await {
        Ok(count) => Json(CountResponse {
            id: customer_id,
            count,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(29.004_9), 29.0);
        assert_eq!(round2(29.005_1), 29.01);
        assert_eq!(round2(-1.239), -1.24);
        assert_eq!(round2(0.0), 0.0);
    }
}
