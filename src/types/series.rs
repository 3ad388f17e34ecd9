//! Provenance-tagged series types.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    ANCHOR_YEAR, BASELINE_YEAR, INTERPOLATION_END_YEAR, PREDICTION_START_YEAR, SERIES_END_YEAR,
};

/// Where a series value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Measured FAO value (2000, 2010)
    Real,
    /// Derived from the anchors by formula (2001-2009, 2011-2025)
    Interpolated,
    /// Supplied by the predictive model (2026-2075)
    Predicted,
}

impl Provenance {
    /// Provenance is a pure function of the year.
    ///
    /// Returns `None` for years outside 2000..=2075.
    pub const fn for_year(year: i32) -> Option<Self> {
        match year {
            BASELINE_YEAR | ANCHOR_YEAR => Some(Self::Real),
            2001..=2009 | 2011..=INTERPOLATION_END_YEAR => Some(Self::Interpolated),
            PREDICTION_START_YEAR..=SERIES_END_YEAR => Some(Self::Predicted),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Interpolated => "interpolated",
            Self::Predicted => "predicted",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantity a series is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMetric {
    /// Forest cover as a percentage of total area (0-100)
    #[default]
    Percent,
    /// Forest cover area in km²
    Area,
}

impl SeriesMetric {
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Area => "km2",
        }
    }
}

/// Availability of a point's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    Ok,
    PredictionUnavailable,
}

/// One annual value of a country series.
///
/// `value` is always present for real and interpolated points. A predicted
/// point whose forecast failed carries `status = prediction_unavailable` and
/// the model's reason instead of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub provenance: Provenance,
    pub value: Option<f64>,
    pub status: PointStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SeriesPoint {
    const fn with_value(year: i32, provenance: Provenance, value: f64) -> Self {
        Self {
            year,
            provenance,
            value: Some(value),
            status: PointStatus::Ok,
            reason: None,
        }
    }

    pub const fn real(year: i32, value: f64) -> Self {
        Self::with_value(year, Provenance::Real, value)
    }

    pub const fn interpolated(year: i32, value: f64) -> Self {
        Self::with_value(year, Provenance::Interpolated, value)
    }

    pub const fn predicted(year: i32, value: f64) -> Self {
        Self::with_value(year, Provenance::Predicted, value)
    }

    pub fn unavailable(year: i32, reason: impl Into<String>) -> Self {
        Self {
            year,
            provenance: Provenance::Predicted,
            value: None,
            status: PointStatus::PredictionUnavailable,
            reason: Some(reason.into()),
        }
    }

    pub const fn is_available(&self) -> bool {
        matches!(self.status, PointStatus::Ok)
    }
}

/// Point counts by provenance, reported alongside every series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesSummary {
    pub real: usize,
    pub interpolated: usize,
    pub predicted: usize,
    pub unavailable: usize,
}

/// A country's series in one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    pub country: String,
    pub metric: SeriesMetric,
    pub unit: &'static str,
    pub points: Vec<SeriesPoint>,
}

impl CountrySeries {
    pub fn summary(&self) -> SeriesSummary {
        self.points.iter().fold(SeriesSummary::default(), |mut s, p| {
            match p.provenance {
                Provenance::Real => s.real += 1,
                Provenance::Interpolated => s.interpolated += 1,
                Provenance::Predicted => s.predicted += 1,
            }
            if !p.is_available() {
                s.unavailable += 1;
            }
            s
        })
    }
}
