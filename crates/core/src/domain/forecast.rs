use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire request for `POST /predict`. The two fields stay raw strings here;
/// parsing happens in the handler so a bad date becomes a 400, not a 422
/// from body deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub start_date: String,
    pub end_date: String,
}

/// One forecasted day: point estimate plus uncertainty bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastPoint>,
}
