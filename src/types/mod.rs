//! Shared data structures for the forest cover service
//!
//! - `CountryRecord`: one cleaned, unit-converted row of the measurement table
//! - `SeriesPoint` / `CountrySeries`: provenance-tagged annual values 2000-2075
//! - `SeriesMetric`: which quantity a series is expressed in

mod country;
mod series;

pub use country::*;
pub use series::*;
