//! API route handlers
//!
//! - Country records, deltas and rankings
//! - Provenance-tagged series and predicted-only windows
//! - Regression predictions and model metrics
//! - Health and load-time data quality

mod countries;
mod models;
mod series;
mod system;

pub use countries::*;
pub use models::*;
pub use series::*;
pub use system::*;

use axum::response::Response;
use std::sync::Arc;

use super::envelope::ApiErrorResponse;
use crate::config::defaults::{DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT};
use crate::data::DataStore;
use crate::model::ModelSet;
use crate::series::SeriesGenerator;
use crate::types::SeriesMetric;

// ============================================================================
// API State
// ============================================================================

/// Shared, read-only state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<DataStore>,
    pub models: ModelSet,
    pub generator: SeriesGenerator,
}

impl ApiState {
    pub fn new(store: Arc<DataStore>, models: ModelSet, moderating_factor: f64) -> Self {
        let generator = SeriesGenerator::new(store.clone(), models.forecaster.clone())
            .with_moderating_factor(moderating_factor);
        Self {
            store,
            models,
            generator,
        }
    }
}

// ============================================================================
// Query parsing
// ============================================================================
//
// Query values are taken as strings and parsed here so malformed input gets
// the JSON error envelope instead of axum's plain-text rejection.

fn parse_metric(raw: Option<&str>) -> Result<SeriesMetric, Response> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("percent") => Ok(SeriesMetric::Percent),
        Some("area") => Ok(SeriesMetric::Area),
        Some(other) => Err(ApiErrorResponse::bad_request(format!(
            "metric must be 'percent' or 'area', got '{other}'"
        ))),
    }
}

fn parse_year(name: &str, raw: Option<&str>) -> Result<Option<i32>, Response> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            ApiErrorResponse::bad_request(format!("{name} must be a year, got '{s}'"))
        }),
    }
}

fn parse_limit(raw: Option<&str>) -> Result<usize, Response> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_RANKING_LIMIT),
        Some(s) => s
            .parse::<usize>()
            .map(|n| n.min(MAX_RANKING_LIMIT))
            .map_err(|_| {
                ApiErrorResponse::bad_request(format!("limit must be a non-negative integer, got '{s}'"))
            }),
    }
}
