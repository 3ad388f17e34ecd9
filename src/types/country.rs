//! Country measurement record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::SeriesMetric;

/// Normalise a country name into its lookup key.
///
/// Lookups are case-insensitive and ignore surrounding whitespace.
pub fn country_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Real FAO measurements for one country, areas already converted to km².
///
/// Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Country name as it appears in the source table
    pub name: String,
    /// Total land area (km²)
    pub area_km2: f64,
    /// Forest cover in 2000 (km²)
    pub cover_2000_km2: f64,
    /// Forest cover in 2000 (% of total area, 0-100)
    pub cover_2000_percent: f64,
    /// Forest cover in 2010 (km²)
    pub cover_2010_km2: f64,
    /// Forest cover in 2010 (% of total area, 0-100)
    pub cover_2010_percent: f64,
    /// Source columns the service does not interpret, passed through verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CountryRecord {
    pub fn key(&self) -> String {
        country_key(&self.name)
    }

    /// The (2000, 2010) anchor values in the requested metric.
    pub const fn anchors(&self, metric: SeriesMetric) -> (f64, f64) {
        match metric {
            SeriesMetric::Percent => (self.cover_2000_percent, self.cover_2010_percent),
            SeriesMetric::Area => (self.cover_2000_km2, self.cover_2010_km2),
        }
    }

    /// Convert a forest-cover percentage of this country into km².
    pub fn percent_to_km2(&self, percent: f64) -> f64 {
        self.area_km2 * percent / 100.0
    }
}
