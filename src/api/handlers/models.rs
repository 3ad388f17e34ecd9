//! Model endpoints: single-value regression prediction and metrics

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiState;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::model::regression::Coefficients;
use crate::model::{ModelMetrics, PredictionError};

// ============================================================================
// Predict
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Forest cover in 2000, percent of total area
    pub cover_2000_percent: f64,
    /// Total land area, km²
    pub area_km2: f64,
}

impl PredictRequest {
    fn validate(&self) -> Result<(), String> {
        if !self.cover_2000_percent.is_finite() || !(0.0..=100.0).contains(&self.cover_2000_percent) {
            return Err(format!(
                "cover_2000_percent must be within 0-100, got {}",
                self.cover_2000_percent
            ));
        }
        if !self.area_km2.is_finite() || self.area_km2 < 0.0 {
            return Err(format!("area_km2 must be non-negative, got {}", self.area_km2));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub model: &'static str,
    pub cover_2000_percent: f64,
    pub area_km2: f64,
    pub predicted_cover_2010_percent: f64,
    pub predicted_cover_2010_km2: f64,
}

/// POST /api/v1/predict - 2010 forest cover from 2000 cover and area
pub async fn predict(
    State(state): State<ApiState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(e) => return ApiErrorResponse::bad_request(format!("Invalid request body: {e}")),
    };
    if let Err(msg) = req.validate() {
        return ApiErrorResponse::bad_request(msg);
    }
    let Some(model) = &state.models.regression else {
        return ApiErrorResponse::from_prediction_error(&PredictionError::NoModel);
    };

    let percent = model.predict_decade(req.cover_2000_percent, req.area_km2);
    debug!(
        cover_2000 = req.cover_2000_percent,
        area_km2 = req.area_km2,
        predicted = percent,
        "Regression prediction"
    );
    ApiResponse::ok(PredictResponse {
        model: "regression",
        cover_2000_percent: req.cover_2000_percent,
        area_km2: req.area_km2,
        predicted_cover_2010_percent: percent,
        predicted_cover_2010_km2: req.area_km2 * percent / 100.0,
    })
}

// ============================================================================
// Performance
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegressionSummary {
    pub coefficients: Coefficients,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Serialize)]
pub struct ModelPerformance {
    /// Model behind the 2026-2075 segment
    pub forecaster: Option<&'static str>,
    pub regression: Option<RegressionSummary>,
}

/// GET /api/v1/models/performance
pub async fn models_performance(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(ModelPerformance {
        forecaster: state.models.forecaster_name(),
        regression: state.models.regression.as_ref().map(|m| RegressionSummary {
            coefficients: m.coefficients(),
            metrics: m.metrics(),
        }),
    })
}
