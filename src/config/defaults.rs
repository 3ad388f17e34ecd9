//! System-wide default constants.
//!
//! Centralises the year boundaries, unit factors and data-quality tolerances
//! used across the loader, the series generator and the API.

// ============================================================================
// Series Year Layout
// ============================================================================

/// First real measurement year.
pub const BASELINE_YEAR: i32 = 2000;

/// Second real measurement year.
pub const ANCHOR_YEAR: i32 = 2010;

/// Last year produced by the moderated interpolation formula.
pub const INTERPOLATION_END_YEAR: i32 = 2025;

/// First year delegated to the predictive model.
pub const PREDICTION_START_YEAR: i32 = 2026;

/// Last year of every generated series.
pub const SERIES_END_YEAR: i32 = 2075;

/// Number of annual points in a full series (2000..=2075).
pub const SERIES_LEN: usize = (SERIES_END_YEAR - BASELINE_YEAR + 1) as usize;

/// Years between the two anchors.
pub const ANCHOR_SPAN_YEARS: f64 = (ANCHOR_YEAR - BASELINE_YEAR) as f64;

/// Multiplicative decay applied per elapsed decade to the projected rate.
///
/// The exponent is continuous: `0.85^((year - 2010) / 10)`.
pub const MODERATING_FACTOR: f64 = 0.85;

// ============================================================================
// Units
// ============================================================================

/// Hectares per square kilometre. FAO tables report areas in hectares.
pub const HECTARES_PER_KM2: f64 = 100.0;

// ============================================================================
// Data Quality
// ============================================================================

/// Relative slack allowed when forest cover exceeds total area (source noise).
pub const COVER_AREA_RELATIVE_TOLERANCE: f64 = 0.01;

/// Absolute slack (km²) allowed when forest cover exceeds total area.
pub const COVER_AREA_ABSOLUTE_TOLERANCE_KM2: f64 = 1.0;

/// Slack (percentage points) allowed outside the 0-100 range.
pub const PERCENT_TOLERANCE: f64 = 0.5;

/// Slack (percentage points) between a published `delta_percent` and the
/// recomputed 2000 minus 2010 difference.
pub const DELTA_PERCENT_TOLERANCE: f64 = 0.5;

// ============================================================================
// API
// ============================================================================

/// Default number of countries returned by the ranking endpoints.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Upper bound on a ranking `limit` query parameter.
pub const MAX_RANKING_LIMIT: usize = 250;

/// Default HTTP bind address.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";

/// Default measurement table location.
pub const DEFAULT_MEASUREMENTS_PATH: &str = "data/Deforestation.csv";

/// Default long-range forecast table location.
pub const DEFAULT_LONG_RANGE_PATH: &str = "data/forest_predictions_2011_2075.csv";
