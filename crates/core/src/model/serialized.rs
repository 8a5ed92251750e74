use crate::domain::forecast::ForecastPoint;
use crate::model::Forecaster;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::path::Path;

const YEARLY_PERIOD_DAYS: f64 = 365.25;

/// A fitted additive model as exported by the training pipeline: piecewise
/// linear trend, additive weekly term, optional yearly Fourier terms, and a
/// symmetric half-width for the uncertainty interval. Evaluation is pure
/// arithmetic; nothing here trains or refits.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializedModel {
    /// Trend reference date; t is measured in days since this.
    pub origin: NaiveDate,
    pub trend: Trend,
    /// Additive offset per weekday, Monday first.
    #[serde(default)]
    pub weekly: Option<[f64; 7]>,
    /// Yearly seasonality as (cos, sin) Fourier coefficient pairs, harmonic
    /// order 1..=len.
    #[serde(default)]
    pub yearly: Vec<[f64; 2]>,
    pub interval_width: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trend {
    pub intercept: f64,
    pub slope: f64,
    #[serde(default)]
    pub changepoints: Vec<Changepoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Changepoint {
    pub date: NaiveDate,
    /// Slope adjustment applied to days after `date`.
    pub delta: f64,
}

impl SerializedModel {
    /// Read and validate the artifact. Called once at startup; any failure
    /// here must abort the process before a listener is bound.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).with_context(|| {
            format!("forecast model artifact not found at {}", path.display())
        })?;
        let model = Self::from_json(&raw)
            .with_context(|| format!("invalid model artifact at {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            changepoints = model.trend.changepoints.len(),
            yearly_terms = model.yearly.len(),
            "forecast model loaded"
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let model: Self =
            serde_json::from_str(raw).context("failed to parse serialized model JSON")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.interval_width.is_finite() && self.interval_width >= 0.0,
            "interval_width must be finite and non-negative, got {}",
            self.interval_width
        );
        anyhow::ensure!(
            self.trend.intercept.is_finite() && self.trend.slope.is_finite(),
            "trend parameters must be finite"
        );
        Ok(())
    }

    fn eval(&self, date: NaiveDate) -> f64 {
        let t = (date - self.origin).num_days() as f64;
        let mut y = self.trend.intercept + self.trend.slope * t;

        for cp in &self.trend.changepoints {
            let since = (date - cp.date).num_days();
            if since > 0 {
                y += cp.delta * since as f64;
            }
        }

        if let Some(weekly) = &self.weekly {
            y += weekly[date.weekday().num_days_from_monday() as usize];
        }

        let day_of_year = date.ordinal0() as f64;
        for (n, coef) in self.yearly.iter().enumerate() {
            let [a, b] = *coef;
            let phase =
                2.0 * std::f64::consts::PI * (n as f64 + 1.0) * day_of_year / YEARLY_PERIOD_DAYS;
            y += a * phase.cos() + b * phase.sin();
        }

        y
    }
}

impl Forecaster for SerializedModel {
    fn model_name(&self) -> &'static str {
        "serialized_additive"
    }

    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<ForecastPoint>> {
        let mut out = Vec::with_capacity(dates.len());
        for &ds in dates {
            let yhat = self.eval(ds);
            out.push(ForecastPoint {
                ds,
                yhat,
                yhat_lower: yhat - self.interval_width,
                yhat_upper: yhat + self.interval_width,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::range::daily_sequence;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn trend_only_model() -> SerializedModel {
        let v = json!({
            "origin": "2024-01-01",
            "trend": {"intercept": 100.0, "slope": 2.0},
            "interval_width": 5.0
        });
        SerializedModel::from_json(&v.to_string()).unwrap()
    }

    #[test]
    fn linear_trend_evaluates_per_day() {
        let model = trend_only_model();
        let points = model.predict(&[d(2024, 1, 1), d(2024, 1, 3)]).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].yhat, 100.0);
        assert_eq!(points[1].yhat, 104.0);
        assert_eq!(points[1].yhat_lower, 99.0);
        assert_eq!(points[1].yhat_upper, 109.0);
    }

    #[test]
    fn one_point_per_date_in_input_order() {
        let model = trend_only_model();
        let dates = daily_sequence(d(2024, 1, 1), d(2024, 1, 10));
        let points = model.predict(&dates).unwrap();

        assert_eq!(points.len(), dates.len());
        let out_dates: Vec<NaiveDate> = points.iter().map(|p| p.ds).collect();
        assert_eq!(out_dates, dates);
    }

    #[test]
    fn prediction_is_deterministic() {
        let model = trend_only_model();
        let dates = daily_sequence(d(2024, 3, 1), d(2024, 3, 14));
        assert_eq!(model.predict(&dates).unwrap(), model.predict(&dates).unwrap());
    }

    #[test]
    fn changepoint_applies_only_after_its_date() {
        let v = json!({
            "origin": "2024-01-01",
            "trend": {
                "intercept": 0.0,
                "slope": 1.0,
                "changepoints": [{"date": "2024-01-05", "delta": 0.5}]
            },
            "interval_width": 0.0
        });
        let model = SerializedModel::from_json(&v.to_string()).unwrap();

        // On the changepoint date the delta has no effect yet.
        let points = model
            .predict(&[d(2024, 1, 5), d(2024, 1, 7)])
            .unwrap();
        assert_eq!(points[0].yhat, 4.0);
        assert_eq!(points[1].yhat, 6.0 + 0.5 * 2.0);
    }

    #[test]
    fn weekly_term_follows_weekday() {
        let v = json!({
            "origin": "2024-01-01",
            "trend": {"intercept": 10.0, "slope": 0.0},
            "weekly": [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
            "interval_width": 0.0
        });
        let model = SerializedModel::from_json(&v.to_string()).unwrap();

        // 2024-01-01 is a Monday.
        let points = model.predict(&[d(2024, 1, 1), d(2024, 1, 7)]).unwrap();
        assert_eq!(points[0].yhat, 11.0);
        assert_eq!(points[1].yhat, 17.0);
    }

    #[test]
    fn empty_date_sequence_yields_empty_forecast() {
        let model = trend_only_model();
        assert!(model.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn rejects_negative_interval_width() {
        let v = json!({
            "origin": "2024-01-01",
            "trend": {"intercept": 0.0, "slope": 0.0},
            "interval_width": -1.0
        });
        assert!(SerializedModel::from_json(&v.to_string()).is_err());
    }

    #[test]
    fn rejects_malformed_artifact_json() {
        assert!(SerializedModel::from_json("{\"origin\": 42}").is_err());
    }

    #[test]
    fn load_fails_on_missing_file() {
        let err = SerializedModel::load("no/such/serialized_model.json").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
