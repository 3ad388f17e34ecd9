//! Least-squares decade model.
//!
//! Fits `cover_2010 = b0 + b1 * cover_2000 + b2 * area_km2` across every
//! country in the store. The fitted map advances forest cover by one decade;
//! forecasts start from the real 2010 value and apply it repeatedly, blending
//! linearly inside a decade:
//!
//! ```text
//! k = (year - 2010) / 10          (fractional)
//! v(0) = cover_2010
//! v(n+1) = clamp(f(v(n), area), 0, 100)
//! value(year) = v(floor k) + frac(k) * (v(floor k + 1) - v(floor k))
//! ```

use serde::Serialize;
use statrs::statistics::Statistics;

use super::{ModelError, ModelFeatures, PredictionError, PredictiveModel};
use crate::config::defaults::{ANCHOR_YEAR, SERIES_END_YEAR};
use crate::types::CountryRecord;

/// Minimum countries needed for a three-parameter fit.
const MIN_SAMPLES: usize = 3;

/// Relative determinant below which the two features are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Training-set quality of the fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub samples: usize,
    pub r_squared: f64,
    pub mae: f64,
    pub rmse: f64,
}

/// Fitted coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub cover_2000: f64,
    pub area_km2: f64,
}

#[derive(Debug, Clone)]
pub struct RegressionModel {
    coefficients: Coefficients,
    metrics: ModelMetrics,
}

impl RegressionModel {
    /// Ordinary least squares over the records' (2000 %, area) → 2010 %.
    ///
    /// When the features are collinear (or area is constant) the area term is
    /// dropped and a simple regression on 2000 cover is fitted instead.
    pub fn fit<'a>(records: impl IntoIterator<Item = &'a CountryRecord>) -> Result<Self, ModelError> {
        let (x1, x2, y): (Vec<f64>, Vec<f64>, Vec<f64>) = records.into_iter().fold(
            (Vec::new(), Vec::new(), Vec::new()),
            |(mut x1, mut x2, mut y), r| {
                x1.push(r.cover_2000_percent);
                x2.push(r.area_km2);
                y.push(r.cover_2010_percent);
                (x1, x2, y)
            },
        );

        let n = y.len();
        if n < MIN_SAMPLES {
            return Err(ModelError::InsufficientData {
                needed: MIN_SAMPLES,
                available: n,
            });
        }

        let (m1, m2, my) = (x1.iter().mean(), x2.iter().mean(), y.iter().mean());

        let (mut s11, mut s22, mut s12, mut s1y, mut s2y) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for i in 0..n {
            let (d1, d2, dy) = (x1[i] - m1, x2[i] - m2, y[i] - my);
            s11 += d1 * d1;
            s22 += d2 * d2;
            s12 += d1 * d2;
            s1y += d1 * dy;
            s2y += d2 * dy;
        }

        let det = s11 * s22 - s12 * s12;
        let (b1, b2) = if s11 > 0.0 && s22 > 0.0 && det.abs() > COLLINEAR_EPSILON * s11 * s22 {
            ((s1y * s22 - s2y * s12) / det, (s2y * s11 - s1y * s12) / det)
        } else if s11 > 0.0 {
            (s1y / s11, 0.0)
        } else {
            (0.0, 0.0)
        };

        let coefficients = Coefficients {
            intercept: my - b1 * m1 - b2 * m2,
            cover_2000: b1,
            area_km2: b2,
        };

        let residuals: Vec<f64> = (0..n)
            .map(|i| y[i] - coefficients.apply(x1[i], x2[i]))
            .collect();
        let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
        let ss_tot: f64 = y.iter().map(|v| (v - my).powi(2)).sum();
        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        let metrics = ModelMetrics {
            samples: n,
            r_squared,
            mae: residuals.iter().map(|r| r.abs()).mean(),
            rmse: (ss_res / n as f64).sqrt(),
        };

        Ok(Self {
            coefficients,
            metrics,
        })
    }

    pub const fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub const fn metrics(&self) -> ModelMetrics {
        self.metrics
    }

    /// One decade step: predicted cover ten years after `cover_percent`.
    pub fn predict_decade(&self, cover_percent: f64, area_km2: f64) -> f64 {
        self.coefficients.apply(cover_percent, area_km2).clamp(0.0, 100.0)
    }
}

impl Coefficients {
    fn apply(&self, cover: f64, area: f64) -> f64 {
        self.intercept + self.cover_2000 * cover + self.area_km2 * area
    }
}

impl PredictiveModel for RegressionModel {
    fn name(&self) -> &'static str {
        "regression"
    }

    fn predict(&self, features: &ModelFeatures, year: i32) -> Result<f64, PredictionError> {
        if year <= ANCHOR_YEAR || year > SERIES_END_YEAR {
            return Err(PredictionError::OutOfHorizon(year));
        }

        let decades = f64::from(year - ANCHOR_YEAR) / 10.0;
        let whole = decades.floor();
        let frac = decades - whole;

        let mut current = features.cover_2010_percent;
        for _ in 0..whole as u32 {
            current = self.predict_decade(current, features.total_area_km2);
        }
        let value = if frac > 0.0 {
            let next = self.predict_decade(current, features.total_area_km2);
            current + frac * (next - current)
        } else {
            current
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(PredictionError::NonFinite(year))
        }
    }
}
