use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use foresight_core::domain::forecast::{ForecastResponse, PredictionRequest};
use foresight_core::model::Forecaster;
use foresight_core::time::range;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn Forecaster>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/predict", post(predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct RootMessage {
    message: &'static str,
}

async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: "Hello World",
    })
}

#[derive(Debug)]
pub enum ApiError {
    /// A request date failed to parse. Client error, model never invoked.
    InvalidDateFormat(range::DateFormatError),
    /// The forecasting capability failed mid-request. Server error; the
    /// process keeps serving subsequent requests.
    Prediction(anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidDateFormat(err) => {
                tracing::debug!(error = %err, "rejected prediction request");
                let body = ErrorBody {
                    detail: "Invalid date format. Please use YYYY-MM-DD.".to_string(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Prediction(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "prediction failed");
                let body = ErrorBody {
                    detail: "internal error".to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<ForecastResponse>, ApiError> {
    // Both dates are validated before any model work happens.
    let start = range::parse_date(&req.start_date).map_err(ApiError::InvalidDateFormat)?;
    let end = range::parse_date(&req.end_date).map_err(ApiError::InvalidDateFormat)?;

    // A reversed range expands to an empty sequence and comes back as an
    // empty forecast with status 200. No ordering is enforced here.
    let dates = range::daily_sequence(start, end);

    let forecast = state.model.predict(&dates).map_err(ApiError::Prediction)?;

    Ok(Json(ForecastResponse { forecast }))
}
