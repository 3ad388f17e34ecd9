//! Series Derivation
//!
//! Turns a country's two real anchors (2000, 2010) into a 76-point annual
//! series running to 2075:
//!
//! | Years       | Provenance   | Source                                            |
//! |-------------|--------------|---------------------------------------------------|
//! | 2000, 2010  | Real         | measurement table                                 |
//! | 2001-2009   | Interpolated | straight line between the anchors                 |
//! | 2011-2025   | Interpolated | `v2010 + rate * 0.85^((y - 2010) / 10) * (y - 2010)` |
//! | 2026-2075   | Predicted    | [`PredictiveModel`](crate::model::PredictiveModel) |
//!
//! `rate = (v2010 - v2000) / 10`. The moderating exponent is continuous, not
//! stepped per whole decade.

pub mod generator;

pub use generator::{annual_rate, backfill_value, moderated_value, SeriesError, SeriesGenerator};
