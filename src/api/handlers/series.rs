//! Series endpoints

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{parse_metric, parse_year, ApiState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::{CountrySeries, SeriesSummary};

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub metric: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FutureQuery {
    pub metric: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

/// Series plus provenance counts.
#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    #[serde(flatten)]
    pub series: CountrySeries,
    pub summary: SeriesSummary,
    /// Forecaster behind the predicted points, if any
    pub model: Option<&'static str>,
    /// Total area (km²) from the long-range table (`/future` only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_km2: Option<f64>,
}

impl SeriesResponse {
    fn new(series: CountrySeries, model: Option<&'static str>) -> Self {
        Self {
            summary: series.summary(),
            series,
            model,
            area_km2: None,
        }
    }
}

/// GET /api/v1/series/:name?metric=percent|area
pub async fn get_series(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(q): Query<SeriesQuery>,
) -> Response {
    let metric = match parse_metric(q.metric.as_deref()) {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    match state.generator.generate(&name, metric) {
        Ok(series) => ApiResponse::ok(SeriesResponse::new(series, state.generator.model_name())),
        Err(e) => ApiErrorResponse::from_series_error(&e),
    }
}

/// GET /api/v1/future/:name?start_year=2030&end_year=2050&metric=area
pub async fn get_future(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(q): Query<FutureQuery>,
) -> Response {
    let parsed = parse_metric(q.metric.as_deref()).and_then(|metric| {
        let start = parse_year("start_year", q.start_year.as_deref())?;
        let end = parse_year("end_year", q.end_year.as_deref())?;
        Ok((metric, start, end))
    });
    let (metric, start, end) = match parsed {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match state.generator.future(&name, metric, start, end) {
        Ok(series) => {
            let area_km2 = state.models.long_range_area_km2(&series.country);
            ApiResponse::ok(SeriesResponse {
                area_km2,
                ..SeriesResponse::new(series, state.generator.model_name())
            })
        }
        Err(e) => ApiErrorResponse::from_series_error(&e),
    }
}
