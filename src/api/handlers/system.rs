//! Health and data-quality endpoints

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use super::ApiState;
use crate::api::envelope::ApiResponse;
use crate::data::DataQualityIssue;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub countries: usize,
    pub rejected_rows: usize,
    pub forecaster: Option<&'static str>,
    pub regression_ready: bool,
}

/// GET /health - liveness plus dataset counts
pub async fn health(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        countries: state.store.len(),
        rejected_rows: state.store.issues().len(),
        forecaster: state.models.forecaster_name(),
        regression_ready: state.models.regression.is_some(),
    })
}

/// Measurement-table counts at the top level; the long-range table, when
/// one was loaded, under `long_range`.
#[derive(Debug, Serialize)]
pub struct DataQualityReport<'a> {
    pub source: Option<String>,
    pub loaded: usize,
    pub rejected: usize,
    pub duplicates_dropped: usize,
    pub issues: &'a [DataQualityIssue],
    pub long_range: Option<LongRangeQuality<'a>>,
}

#[derive(Debug, Serialize)]
pub struct LongRangeQuality<'a> {
    pub source: Option<String>,
    pub loaded: usize,
    pub rejected: usize,
    pub issues: &'a [DataQualityIssue],
}

/// GET /api/v1/data/quality - rows rejected at load
pub async fn data_quality(State(state): State<ApiState>) -> Response {
    let issues = state.store.issues();
    let long_range = state.models.long_range.as_deref().map(|table| LongRangeQuality {
        source: table.source().map(|p| p.display().to_string()),
        loaded: table.len(),
        rejected: table.issues().len(),
        issues: table.issues(),
    });
    ApiResponse::ok(DataQualityReport {
        source: state.store.source().map(|p| p.display().to_string()),
        loaded: state.store.len(),
        rejected: issues.len(),
        duplicates_dropped: state.store.duplicates_dropped(),
        issues,
        long_range,
    })
}
