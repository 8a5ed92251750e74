pub mod serialized;

use crate::domain::forecast::ForecastPoint;
use chrono::NaiveDate;

/// The single seam to the pre-trained forecasting capability.
///
/// Implementations must be deterministic for a fixed model: one output point
/// per input date, in input order, with no side effects. The loaded model is
/// read-only after startup, so implementations are shared freely across
/// concurrent requests.
pub trait Forecaster: Send + Sync {
    fn model_name(&self) -> &'static str;

    fn predict(&self, dates: &[NaiveDate]) -> anyhow::Result<Vec<ForecastPoint>>;
}
