//! Predictive Model Module
//!
//! The series generator asks a [`PredictiveModel`] for every year from 2026
//! on. The trait is deliberately narrow (country features in, one value per
//! year out) so the interpolation and provenance logic can be exercised with
//! deterministic stubs.
//!
//! ## Implementations
//! - `table`: forecasts read from the companion long-range CSV
//! - `regression`: least-squares fit of 2010 cover on 2000 cover and area,
//!   iterated decade by decade
//!
//! All models speak forest-cover **percent**; callers convert to km².

pub mod regression;
pub mod table;

pub use regression::{ModelMetrics, RegressionModel};
pub use table::TableModel;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::data::{DataQualityIssue, DataStore, LongRangeTable};
use crate::types::CountryRecord;

/// Country features handed to a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFeatures {
    pub country: String,
    pub cover_2000_percent: f64,
    pub cover_2010_percent: f64,
    pub total_area_km2: f64,
}

impl From<&CountryRecord> for ModelFeatures {
    fn from(r: &CountryRecord) -> Self {
        Self {
            country: r.name.clone(),
            cover_2000_percent: r.cover_2000_percent,
            cover_2010_percent: r.cover_2010_percent,
            total_area_km2: r.area_km2,
        }
    }
}

/// A single forecast could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("no forecast for country '{0}'")]
    UnknownCountry(String),

    #[error("forecast row rejected at load: {0}")]
    RejectedRow(DataQualityIssue),

    #[error("no forecast for {country} in {year}")]
    MissingYear { country: String, year: i32 },

    #[error("year {0} is outside the forecast horizon")]
    OutOfHorizon(i32),

    #[error("model produced a non-finite value for {0}")]
    NonFinite(i32),

    #[error("no predictive model configured")]
    NoModel,
}

/// Fitting a model failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("need at least {needed} samples to fit, have {available}")]
    InsufficientData { needed: usize, available: usize },
}

/// Features in, per-year forest-cover percentage out.
///
/// Calls are synchronous and must not retry; a failure is reported for the
/// affected year only.
pub trait PredictiveModel: Send + Sync {
    /// Short identifier reported by the API.
    fn name(&self) -> &'static str;

    fn predict(&self, features: &ModelFeatures, year: i32) -> Result<f64, PredictionError>;
}

/// Which model backs the 2026-2075 segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Long-range table if it loads, otherwise the regression
    #[default]
    Auto,
    Table,
    Regression,
    /// Every predicted point reports `prediction_unavailable`
    None,
}

/// Models wired up at startup.
#[derive(Clone, Default)]
pub struct ModelSet {
    /// Backs the predicted series segment
    pub forecaster: Option<Arc<dyn PredictiveModel>>,
    /// Serves `/predict` and `/models/performance`
    pub regression: Option<Arc<RegressionModel>>,
    /// Long-range table, when it was loaded
    pub long_range: Option<Arc<LongRangeTable>>,
}

impl ModelSet {
    /// Fit the regression on `store` and pick the forecaster for `source`.
    ///
    /// Only an explicit `Table` source whose file cannot be read is fatal;
    /// every other failure degrades to unavailable predictions with a warning.
    pub fn build(
        source: ModelSource,
        store: &DataStore,
        long_range_path: &Path,
    ) -> Result<Self, crate::data::DataError> {
        let regression = match RegressionModel::fit(store.countries()) {
            Ok(m) => {
                let metrics = m.metrics();
                info!(
                    samples = metrics.samples,
                    r_squared = metrics.r_squared,
                    rmse = metrics.rmse,
                    "Regression model fitted"
                );
                Some(Arc::new(m))
            }
            Err(e) => {
                warn!(error = %e, "Regression model unavailable");
                None
            }
        };

        let as_dyn = |m: &Arc<RegressionModel>| -> Arc<dyn PredictiveModel> { m.clone() };
        let as_table =
            |t: &Arc<LongRangeTable>| -> Arc<dyn PredictiveModel> { Arc::new(TableModel::new(t.clone())) };

        let long_range = match source {
            ModelSource::Table => Some(Arc::new(LongRangeTable::load(long_range_path)?)),
            ModelSource::Auto => match LongRangeTable::load(long_range_path) {
                Ok(table) => Some(Arc::new(table)),
                Err(e) => {
                    warn!(error = %e, "Long-range table unavailable, falling back to regression");
                    None
                }
            },
            ModelSource::Regression | ModelSource::None => None,
        };

        let forecaster: Option<Arc<dyn PredictiveModel>> = match source {
            ModelSource::None => None,
            ModelSource::Regression => regression.as_ref().map(as_dyn),
            ModelSource::Table | ModelSource::Auto => long_range
                .as_ref()
                .map(as_table)
                .or_else(|| regression.as_ref().map(as_dyn)),
        };

        match &forecaster {
            Some(m) => info!(model = m.name(), "Forecaster ready"),
            None => warn!("No forecaster configured; predicted points will be unavailable"),
        }

        Ok(Self {
            forecaster,
            regression,
            long_range,
        })
    }

    pub fn forecaster_name(&self) -> Option<&'static str> {
        self.forecaster.as_ref().map(|m| m.name())
    }

    /// Rows of the long-range table rejected at load.
    pub fn long_range_issues(&self) -> &[DataQualityIssue] {
        self.long_range.as_ref().map(|t| t.issues()).unwrap_or_default()
    }

    /// Total area (km²) the long-range table lists for `country`.
    pub fn long_range_area_km2(&self, country: &str) -> Option<f64> {
        self.long_range
            .as_ref()
            .and_then(|t| t.get(country))
            .and_then(|row| row.area_km2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store() -> DataStore {
        let rows = [
            ("A", 30.0, 28.0, 1_000.0),
            ("B", 50.0, 47.0, 2_000.0),
            ("C", 10.0, 11.0, 1_500.0),
            ("D", 70.0, 66.0, 3_000.0),
        ];
        DataStore::from_records(
            rows.iter()
                .map(|&(n, p0, p1, a)| CountryRecord {
                    name: n.to_string(),
                    area_km2: a,
                    cover_2000_km2: a * p0 / 100.0,
                    cover_2000_percent: p0,
                    cover_2010_km2: a * p1 / 100.0,
                    cover_2010_percent: p1,
                    extra: Default::default(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_auto_falls_back_to_regression_without_table() {
        let set = ModelSet::build(ModelSource::Auto, &store(), Path::new("/nonexistent.csv")).unwrap();
        assert_eq!(set.forecaster_name(), Some("regression"));
        assert!(set.regression.is_some());
    }

    #[test]
    fn test_auto_prefers_table() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"country,area,2026\nA,100000,27.0\nB,n/a,40.0\n").unwrap();
        let set = ModelSet::build(ModelSource::Auto, &store(), f.path()).unwrap();
        assert_eq!(set.forecaster_name(), Some("long_range_table"));
        assert_eq!(set.long_range_area_km2("a"), Some(1_000.0));
        assert_eq!(set.long_range_issues().len(), 1);
        assert_eq!(set.long_range_issues()[0].country.as_deref(), Some("B"));
    }

    #[test]
    fn test_explicit_table_missing_is_fatal() {
        let result = ModelSet::build(ModelSource::Table, &store(), Path::new("/nonexistent.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_none_source_has_no_forecaster() {
        let set = ModelSet::build(ModelSource::None, &store(), Path::new("/nonexistent.csv")).unwrap();
        assert!(set.forecaster.is_none());
        assert!(set.regression.is_some());
        assert!(set.long_range_issues().is_empty());
        assert_eq!(set.long_range_area_km2("A"), None);
    }
}
