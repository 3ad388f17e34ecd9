//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` from CSV
//! fixtures on disk and exercise every endpoint using
//! `tower::ServiceExt::oneshot()`. No binary spawn, no network port.

use forest_cover::api::{create_app, ApiState};
use forest_cover::data::DataStore;
use forest_cover::model::{ModelSet, ModelSource};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

// Areas in hectares, as published.
const MEASUREMENTS: &str = "\
country,area,two_thousand_percent,two_thousand_area,two_thousand_ten_percent,two_thousand_ten_area,delta_percent,delta_area
Brazil,100000000,65,65000000,60,60000000,5,5000000
Spain,50000000,35,17500000,37,18500000,-2,-1000000
Chile,75000000,20,15000000,20,15000000,0,0
Nigeria,90000000,18,16200000,10,9000000,8,7200000
Narnia,n/a,50,1000,40,800,10,200
";

struct Fixture {
    _measurements: NamedTempFile,
    _long_range: NamedTempFile,
    state: ApiState,
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

/// Long-range table with a flat 50% forecast for Brazil only.
fn long_range_csv() -> String {
    let years: Vec<String> = (2026..=2075).map(|y| y.to_string()).collect();
    let values = vec!["50.0"; years.len()].join(",");
    format!("country,area,{}\nBrazil,100000000,{}\n", years.join(","), values)
}

fn fixture_with(source: ModelSource) -> Fixture {
    fixture_with_long_range(source, &long_range_csv())
}

fn fixture_with_long_range(source: ModelSource, long_range_csv: &str) -> Fixture {
    let measurements = write_temp(MEASUREMENTS);
    let long_range = write_temp(long_range_csv);
    let store = DataStore::load(measurements.path(), false).unwrap();
    let models = ModelSet::build(source, &store, long_range.path()).unwrap();
    Fixture {
        state: ApiState::new(Arc::new(store), models, 0.85),
        _measurements: measurements,
        _long_range: long_range,
    }
}

fn fixture() -> Fixture {
    fixture_with(ModelSource::Table)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(state: &ApiState, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(create_app(state.clone()), req).await
}

async fn post_json(state: &ApiState, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(create_app(state.clone()), req).await
}

fn point(series: &serde_json::Value, year: i64) -> &serde_json::Value {
    series["data"]["points"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["year"] == year)
        .unwrap()
}

// ============================================================================
// Envelope
// ============================================================================

/// All GET endpoints should return 200 with the data/meta envelope.
#[tokio::test]
async fn test_get_endpoints_return_envelope() {
    let fx = fixture();
    let endpoints = [
        "/health",
        "/api/v1/countries",
        "/api/v1/countries/Brazil",
        "/api/v1/series/Brazil",
        "/api/v1/future/Brazil",
        "/api/v1/rankings/deforestation",
        "/api/v1/rankings/reforestation",
        "/api/v1/models/performance",
        "/api/v1/data/quality",
    ];

    for endpoint in &endpoints {
        let (status, body) = get(&fx.state, endpoint).await;
        assert_eq!(status, StatusCode::OK, "GET {endpoint}");
        assert!(body.get("data").is_some(), "{endpoint} missing data");
        assert!(body["meta"]["timestamp"].is_string(), "{endpoint} missing meta");
    }
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_successful_get_is_cacheable() {
    let fx = fixture();
    let req = Request::builder().uri("/api/v1/countries").body(Body::empty()).unwrap();
    let resp = create_app(fx.state.clone()).oneshot(req).await.unwrap();
    let cache = resp.headers().get("cache-control").unwrap().to_str().unwrap();
    assert!(cache.starts_with("public"), "got {cache}");
}

// ============================================================================
// Countries
// ============================================================================

#[tokio::test]
async fn test_health_counts() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/health").await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["countries"], 4);
    assert_eq!(body["data"]["rejected_rows"], 1);
    assert_eq!(body["data"]["forecaster"], "long_range_table");
}

#[tokio::test]
async fn test_country_list_excludes_rejected_rows() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/countries").await;
    assert_eq!(body["data"]["count"], 4);
    let names: Vec<&str> = body["data"]["countries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Brazil", "Spain", "Chile", "Nigeria"]);
}

#[tokio::test]
async fn test_country_detail_in_km2_with_deltas() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/countries/brazil").await;
    assert_eq!(status, StatusCode::OK);
    let d = &body["data"];
    assert_eq!(d["name"], "Brazil");
    assert_eq!(d["area_km2"], 1_000_000.0);
    assert_eq!(d["cover_2000_km2"], 650_000.0);
    assert_eq!(d["delta"]["percent"]["value"], 5.0);
    assert_eq!(d["delta"]["percent"]["label"], "deforestation");
    assert_eq!(d["delta"]["area_km2"]["value"], 50_000.0);
}

#[tokio::test]
async fn test_unknown_country_is_404() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/countries/Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = get(&fx.state, "/api/v1/series/Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_country_is_422() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/countries/Narnia").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "DATA_QUALITY");

    let (status, _) = get(&fx.state, "/api/v1/series/Narnia").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_data_quality_report() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/data/quality").await;
    assert_eq!(body["data"]["loaded"], 4);
    assert_eq!(body["data"]["rejected"], 1);
    assert_eq!(body["data"]["issues"][0]["country"], "Narnia");
    assert_eq!(body["data"]["issues"][0]["column"], "area");
    assert_eq!(body["data"]["long_range"]["loaded"], 1);
    assert_eq!(body["data"]["long_range"]["rejected"], 0);
}

#[tokio::test]
async fn test_rejected_long_range_row_is_reported() {
    let fx = fixture_with_long_range(
        ModelSource::Table,
        "country,area,2026,2027\nBrazil,100000000,n/a,50\nSpain,50000000,36.0,35.5\n",
    );
    let (_, body) = get(&fx.state, "/api/v1/data/quality").await;
    let lr = &body["data"]["long_range"];
    assert_eq!(lr["loaded"], 1);
    assert_eq!(lr["rejected"], 1);
    assert_eq!(lr["issues"][0]["country"], "Brazil");
    assert_eq!(lr["issues"][0]["column"], "2026");
    // measurement-table counts are unaffected
    assert_eq!(body["data"]["rejected"], 1);

    let (status, body) = get(&fx.state, "/api/v1/future/Brazil?end_year=2026").await;
    assert_eq!(status, StatusCode::OK);
    let p = point(&body, 2026);
    assert_eq!(p["status"], "prediction_unavailable");
    let reason = p["reason"].as_str().unwrap();
    assert!(reason.contains("rejected at load"), "{reason}");
    assert!(reason.contains("n/a"), "{reason}");

    let (_, body) = get(&fx.state, "/api/v1/future/Spain?end_year=2026").await;
    assert_eq!(point(&body, 2026)["value"], 36.0);
}

#[tokio::test]
async fn test_quality_report_without_long_range_table() {
    let fx = fixture_with(ModelSource::Regression);
    let (_, body) = get(&fx.state, "/api/v1/data/quality").await;
    assert!(body["data"]["long_range"].is_null());
}

// ============================================================================
// Rankings
// ============================================================================

#[tokio::test]
async fn test_rankings() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/rankings/deforestation").await;
    let countries = body["data"]["countries"].as_array().unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0]["country"], "Nigeria");
    assert_eq!(countries[0]["rank"], 1);
    assert_eq!(countries[1]["country"], "Brazil");

    let (_, body) = get(&fx.state, "/api/v1/rankings/reforestation").await;
    let countries = body["data"]["countries"].as_array().unwrap();
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0]["country"], "Spain");
}

#[tokio::test]
async fn test_ranking_limit() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/rankings/deforestation?limit=1").await;
    assert_eq!(body["data"]["countries"].as_array().unwrap().len(), 1);

    let (status, body) = get(&fx.state, "/api/v1/rankings/deforestation?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// ============================================================================
// Series
// ============================================================================

#[tokio::test]
async fn test_series_shape_and_provenance() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/series/Brazil").await;
    assert_eq!(status, StatusCode::OK);

    let points = body["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 76);
    for (i, p) in points.iter().enumerate() {
        let year = 2000 + i as i64;
        assert_eq!(p["year"], year);
        let expected = match year {
            2000 | 2010 => "real",
            2026..=2075 => "predicted",
            _ => "interpolated",
        };
        assert_eq!(p["provenance"], expected, "year {year}");
    }

    assert_eq!(point(&body, 2000)["value"], 65.0);
    assert_eq!(point(&body, 2010)["value"], 60.0);
    assert_eq!(point(&body, 2050)["value"], 50.0);
    assert_eq!(body["data"]["unit"], "percent");
    assert_eq!(body["data"]["model"], "long_range_table");
    assert_eq!(body["data"]["summary"]["unavailable"], 0);
}

#[tokio::test]
async fn test_series_area_metric() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/series/Brazil?metric=area").await;
    assert_eq!(body["data"]["unit"], "km2");
    assert_eq!(point(&body, 2000)["value"], 650_000.0);
    // 50% of 1,000,000 km2
    assert_eq!(point(&body, 2050)["value"], 500_000.0);
}

#[tokio::test]
async fn test_series_bad_metric_is_400() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/series/Brazil?metric=hectares").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_series_without_forecast_marks_points_unavailable() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/series/Spain").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 76);
    assert_eq!(body["data"]["summary"]["unavailable"], 50);

    let p = point(&body, 2040);
    assert_eq!(p["status"], "prediction_unavailable");
    assert!(p["value"].is_null());
    assert!(p["reason"].is_string());
}

#[tokio::test]
async fn test_model_none_gives_fifty_unavailable_points() {
    let fx = fixture_with(ModelSource::None);
    let (_, body) = get(&fx.state, "/api/v1/series/Brazil").await;
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 76);
    assert_eq!(body["data"]["summary"]["unavailable"], 50);
    assert!(body["data"]["model"].is_null());
}

#[tokio::test]
async fn test_regression_forecaster_fills_every_year() {
    let fx = fixture_with(ModelSource::Regression);
    let (_, body) = get(&fx.state, "/api/v1/series/Spain").await;
    assert_eq!(body["data"]["summary"]["unavailable"], 0);
    assert_eq!(body["data"]["model"], "regression");
    for p in body["data"]["points"].as_array().unwrap() {
        let v = p["value"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&v), "year {} value {v}", p["year"]);
    }
}

#[tokio::test]
async fn test_future_window() {
    let fx = fixture();
    let (status, body) =
        get(&fx.state, "/api/v1/future/Brazil?start_year=2030&end_year=2034").await;
    assert_eq!(status, StatusCode::OK);
    let points = body["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0]["year"], 2030);
    assert!(points.iter().all(|p| p["provenance"] == "predicted"));

    let (_, body) = get(&fx.state, "/api/v1/future/Brazil").await;
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 50);
    assert_eq!(body["data"]["area_km2"], 1_000_000.0);
}

#[tokio::test]
async fn test_future_area_absent_without_table_row() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/future/Spain").await;
    assert!(body["data"].get("area_km2").is_none());

    let (_, body) = get(&fx.state, "/api/v1/series/Brazil").await;
    assert!(body["data"].get("area_km2").is_none());
}

#[tokio::test]
async fn test_future_unknown_country_is_404_before_window_check() {
    let fx = fixture();
    let (status, body) = get(&fx.state, "/api/v1/future/Atlantis?start_year=2020").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_future_invalid_window_is_400() {
    let fx = fixture();
    for uri in [
        "/api/v1/future/Brazil?start_year=2020",
        "/api/v1/future/Brazil?end_year=2080",
        "/api/v1/future/Brazil?start_year=2060&end_year=2050",
        "/api/v1/future/Brazil?start_year=soon",
    ] {
        let (status, body) = get(&fx.state, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

// ============================================================================
// Models
// ============================================================================

#[tokio::test]
async fn test_predict() {
    let fx = fixture();
    let (status, body) = post_json(
        &fx.state,
        "/api/v1/predict",
        r#"{"cover_2000_percent": 40.0, "area_km2": 500000.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let d = &body["data"];
    assert_eq!(d["model"], "regression");
    let percent = d["predicted_cover_2010_percent"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&percent));
    let km2 = d["predicted_cover_2010_km2"].as_f64().unwrap();
    assert!((km2 - 500_000.0 * percent / 100.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_rejects_bad_input() {
    let fx = fixture();
    for body in [
        "not json",
        r#"{"cover_2000_percent": 40.0}"#,
        r#"{"cover_2000_percent": 140.0, "area_km2": 10.0}"#,
        r#"{"cover_2000_percent": 40.0, "area_km2": -1.0}"#,
    ] {
        let (status, resp) = post_json(&fx.state, "/api/v1/predict", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(resp["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_predict_without_model_is_503() {
    let store = DataStore::from_records(Vec::new());
    let state = ApiState::new(Arc::new(store), ModelSet::default(), 0.85);
    let (status, body) = post_json(
        &state,
        "/api/v1/predict",
        r#"{"cover_2000_percent": 40.0, "area_km2": 10.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "PREDICTION_UNAVAILABLE");
}

#[tokio::test]
async fn test_models_performance() {
    let fx = fixture();
    let (_, body) = get(&fx.state, "/api/v1/models/performance").await;
    assert_eq!(body["data"]["forecaster"], "long_range_table");
    assert_eq!(body["data"]["regression"]["metrics"]["samples"], 4);
    assert!(body["data"]["regression"]["coefficients"]["intercept"].is_number());
}
