//! Forest Cover: FAO forest statistics service
//!
//! Serves per-country forest cover for 2000 and 2010 and extends each country
//! into a 76-year annual series (2000-2075) where every point is tagged with
//! where it came from.
//!
//! ## Architecture
//!
//! - **Data**: CSV loading, hectare to km² conversion, immutable [`DataStore`]
//! - **Series**: anchors, moderated interpolation, model forecasts
//! - **Model**: the [`PredictiveModel`] seam plus table and regression backends
//! - **Analysis**: 2000-2010 deltas and country rankings
//! - **API**: axum router with a uniform JSON envelope

pub mod analysis;
pub mod api;
pub mod config;
pub mod data;
pub mod model;
pub mod series;
pub mod types;

pub use config::AppConfig;

pub use data::{DataError, DataStore, UnitConverter};

pub use model::{ModelSet, ModelSource, PredictiveModel, PredictionError};

pub use series::{SeriesError, SeriesGenerator};

pub use types::{CountryRecord, CountrySeries, Provenance, SeriesMetric, SeriesPoint};
