//! Provenance-tagged series generation.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::defaults::{
    ANCHOR_SPAN_YEARS, ANCHOR_YEAR, BASELINE_YEAR, INTERPOLATION_END_YEAR, MODERATING_FACTOR,
    PREDICTION_START_YEAR, SERIES_END_YEAR, SERIES_LEN,
};
use crate::data::{DataError, DataStore};
use crate::model::{ModelFeatures, PredictionError, PredictiveModel};
use crate::types::{CountryRecord, CountrySeries, SeriesMetric, SeriesPoint};

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(
        "invalid year window {start}-{end}; predicted years run {PREDICTION_START_YEAR}-{SERIES_END_YEAR}"
    )]
    InvalidWindow { start: i32, end: i32 },
}

/// Average yearly change between the anchors.
pub fn annual_rate(value_2000: f64, value_2010: f64) -> f64 {
    (value_2010 - value_2000) / ANCHOR_SPAN_YEARS
}

/// Decay-moderated extrapolation for years after 2010.
pub fn moderated_value(value_2010: f64, annual_rate: f64, moderating_factor: f64, year: i32) -> f64 {
    let elapsed = f64::from(year - ANCHOR_YEAR);
    value_2010 + annual_rate * moderating_factor.powf(elapsed / 10.0) * elapsed
}

/// Straight-line value between the anchors (2001-2009).
pub fn backfill_value(value_2000: f64, annual_rate: f64, year: i32) -> f64 {
    value_2000 + annual_rate * f64::from(year - BASELINE_YEAR)
}

/// Builds country series from the store and an optional forecaster.
///
/// Holds only shared, immutable state; safe to call from many request tasks.
#[derive(Clone)]
pub struct SeriesGenerator {
    store: Arc<DataStore>,
    model: Option<Arc<dyn PredictiveModel>>,
    moderating_factor: f64,
}

impl SeriesGenerator {
    pub fn new(store: Arc<DataStore>, model: Option<Arc<dyn PredictiveModel>>) -> Self {
        Self {
            store,
            model,
            moderating_factor: MODERATING_FACTOR,
        }
    }

    #[must_use]
    pub const fn with_moderating_factor(mut self, factor: f64) -> Self {
        self.moderating_factor = factor;
        self
    }

    pub fn model_name(&self) -> Option<&'static str> {
        self.model.as_ref().map(|m| m.name())
    }

    /// Full 2000-2075 series for `country`.
    ///
    /// Always 76 points in year order. Forecast failures are reported per
    /// point; only an unknown or rejected country fails the call.
    pub fn generate(&self, country: &str, metric: SeriesMetric) -> Result<CountrySeries, SeriesError> {
        let record = self.store.get(country)?;
        let (v2000, v2010) = record.anchors(metric);
        let rate = annual_rate(v2000, v2010);
        let features = ModelFeatures::from(record);

        let mut points = Vec::with_capacity(SERIES_LEN);
        points.push(SeriesPoint::real(BASELINE_YEAR, v2000));
        for year in BASELINE_YEAR + 1..ANCHOR_YEAR {
            points.push(SeriesPoint::interpolated(year, backfill_value(v2000, rate, year)));
        }
        points.push(SeriesPoint::real(ANCHOR_YEAR, v2010));
        for year in ANCHOR_YEAR + 1..=INTERPOLATION_END_YEAR {
            points.push(SeriesPoint::interpolated(
                year,
                moderated_value(v2010, rate, self.moderating_factor, year),
            ));
        }
        for year in PREDICTION_START_YEAR..=SERIES_END_YEAR {
            points.push(self.predicted_point(record, &features, metric, year));
        }

        let series = CountrySeries {
            country: record.name.clone(),
            metric,
            unit: metric.unit(),
            points,
        };
        debug!(
            country = %series.country,
            metric = metric.unit(),
            unavailable = series.summary().unavailable,
            "Series generated"
        );
        Ok(series)
    }

    /// Predicted points only, optionally narrowed to `start..=end`.
    ///
    /// The country is resolved before the window is checked, so an unknown
    /// country reports NotFound whatever the years.
    pub fn future(
        &self,
        country: &str,
        metric: SeriesMetric,
        start: Option<i32>,
        end: Option<i32>,
    ) -> Result<CountrySeries, SeriesError> {
        let record = self.store.get(country)?;
        let start = start.unwrap_or(PREDICTION_START_YEAR);
        let end = end.unwrap_or(SERIES_END_YEAR);
        if start < PREDICTION_START_YEAR || end > SERIES_END_YEAR || start > end {
            return Err(SeriesError::InvalidWindow { start, end });
        }

        let features = ModelFeatures::from(record);
        let points = (start..=end)
            .map(|year| self.predicted_point(record, &features, metric, year))
            .collect();

        Ok(CountrySeries {
            country: record.name.clone(),
            metric,
            unit: metric.unit(),
            points,
        })
    }

    fn predicted_point(
        &self,
        record: &CountryRecord,
        features: &ModelFeatures,
        metric: SeriesMetric,
        year: i32,
    ) -> SeriesPoint {
        let forecast = self
            .model
            .as_ref()
            .ok_or(PredictionError::NoModel)
            .and_then(|m| m.predict(features, year))
            .and_then(|percent| {
                let value = match metric {
                    SeriesMetric::Percent => percent,
                    SeriesMetric::Area => record.percent_to_km2(percent),
                };
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(PredictionError::NonFinite(year))
                }
            });

        match forecast {
            Ok(value) => SeriesPoint::predicted(year, value),
            Err(e) => {
                debug!(country = %record.name, year, error = %e, "Prediction unavailable");
                SeriesPoint::unavailable(year, e.to_string())
            }
        }
    }
}
