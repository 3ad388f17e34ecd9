//! Country endpoints: list, detail with deltas, rankings

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{parse_limit, ApiState};
use crate::analysis::{top_deforestation, top_reforestation, CountryDeltas, RankedCountry};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::CountryRecord;

// ============================================================================
// Countries
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CountryList<'a> {
    pub count: usize,
    pub countries: Vec<&'a str>,
}

/// GET /api/v1/countries
pub async fn list_countries(State(state): State<ApiState>) -> Response {
    let countries = state.store.names();
    ApiResponse::ok(CountryList {
        count: countries.len(),
        countries,
    })
}

/// One country's measurements plus both deltas.
#[derive(Debug, Serialize)]
pub struct CountryDetail<'a> {
    #[serde(flatten)]
    pub record: &'a CountryRecord,
    pub delta: CountryDeltas,
}

/// GET /api/v1/countries/:name
pub async fn get_country(State(state): State<ApiState>, Path(name): Path<String>) -> Response {
    match state.store.get(&name) {
        Ok(record) => ApiResponse::ok(CountryDetail {
            record,
            delta: CountryDeltas::from(record),
        }),
        Err(e) => ApiErrorResponse::from_data_error(&e),
    }
}

// ============================================================================
// Rankings
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub kind: &'static str,
    pub limit: usize,
    pub countries: Vec<RankedCountry>,
}

/// GET /api/v1/rankings/deforestation?limit=10
pub async fn rankings_deforestation(
    State(state): State<ApiState>,
    Query(q): Query<LimitQuery>,
) -> Response {
    let limit = match parse_limit(q.limit.as_deref()) {
        Ok(l) => l,
        Err(resp) => return resp,
    };
    ApiResponse::ok(RankingResponse {
        kind: "deforestation",
        limit,
        countries: top_deforestation(&state.store, limit),
    })
}

/// GET /api/v1/rankings/reforestation?limit=10
pub async fn rankings_reforestation(
    State(state): State<ApiState>,
    Query(q): Query<LimitQuery>,
) -> Response {
    let limit = match parse_limit(q.limit.as_deref()) {
        Ok(l) => l,
        Err(resp) => return resp,
    };
    ApiResponse::ok(RankingResponse {
        kind: "reforestation",
        limit,
        countries: top_reforestation(&state.store, limit),
    })
}
