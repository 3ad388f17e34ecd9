//! API route definitions
//!
//! - /api/v1/countries, /api/v1/countries/:name - records and deltas
//! - /api/v1/series/:name, /api/v1/future/:name - provenance-tagged series
//! - /api/v1/rankings/* - top deforestation / reforestation
//! - /api/v1/predict, /api/v1/models/performance - regression model
//! - /api/v1/data/quality - rows rejected at load

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Versioned API routes, nested under `/api/v1`.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/countries", get(handlers::list_countries))
        .route("/countries/:name", get(handlers::get_country))
        .route("/series/:name", get(handlers::get_series))
        .route("/future/:name", get(handlers::get_future))
        .route("/rankings/deforestation", get(handlers::rankings_deforestation))
        .route("/rankings/reforestation", get(handlers::rankings_reforestation))
        .route("/predict", post(handlers::predict))
        .route("/models/performance", get(handlers::models_performance))
        .route("/data/quality", get(handlers::data_quality))
        .with_state(state)
}

/// Health endpoint at root level
pub fn root_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
