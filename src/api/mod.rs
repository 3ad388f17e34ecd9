//! REST API module using Axum
//!
//! JSON endpoints over the in-memory forest-cover dataset. Every response
//! uses the `{ data, meta }` / `{ error, meta }` envelope from [`envelope`].

pub mod envelope;
pub mod handlers;
pub mod middleware;
mod routes;

pub use handlers::ApiState;

use axum::http::{header, HeaderValue, Method, Uri};
use axum::middleware as axum_mw;
use axum::response::Response;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use envelope::ApiErrorResponse;

/// Env var with comma-separated CORS origins, used when the config lists none.
pub const CORS_ENV_VAR: &str = "FOREST_CORS_ORIGINS";

async fn not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Origins come from `server.cors_origins`, or `FOREST_CORS_ORIGINS` when
/// that list is empty.
fn build_cors_layer(configured: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let origins: Vec<String> = if configured.is_empty() {
        std::env::var(CORS_ENV_VAR)
            .map(|v| v.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_default()
    } else {
        configured.to_vec()
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter(|o| !o.is_empty())
        .filter_map(|o| o.parse().ok())
        .collect();
    if allowed.is_empty() {
        return base;
    }
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let cors = build_cors_layer(&crate::config::get().server.cors_origins);

    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::root_routes(state))
        .fallback(not_found)
        .layer(axum_mw::from_fn(middleware::add_cache_headers))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
