//! API middleware layers.

use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;

/// Lifetime clients may cache successful GET responses for.
///
/// The dataset is immutable for the life of the process.
pub const CACHE_MAX_AGE_SECS: u32 = 300;

/// Marks successful GET responses as cacheable; everything else `no-store`.
pub async fn add_cache_headers(request: axum::extract::Request, next: Next) -> Response {
    let is_get = request.method() == Method::GET;
    let mut response = next.run(request).await;

    let value = if is_get && response.status().is_success() {
        HeaderValue::from_str(&format!("public, max-age={CACHE_MAX_AGE_SECS}"))
            .unwrap_or(HeaderValue::from_static("no-cache"))
    } else {
        HeaderValue::from_static("no-store")
    };
    response.headers_mut().insert(CACHE_CONTROL, value);

    response
}
