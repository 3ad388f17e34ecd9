//! Hectare to km² conversion for designated area columns.

use crate::config::defaults::HECTARES_PER_KM2;

/// Area columns of the measurement table reported in hectares.
pub const MEASUREMENT_AREA_COLUMNS: &[&str] = &[
    "area",
    "two_thousand_area",
    "two_thousand_ten_area",
    "delta_area",
];

/// Area columns of the long-range forecast table reported in hectares.
pub const LONG_RANGE_AREA_COLUMNS: &[&str] = &["area"];

pub fn hectares_to_km2(hectares: f64) -> f64 {
    hectares / HECTARES_PER_KM2
}

pub fn km2_to_hectares(km2: f64) -> f64 {
    km2 * HECTARES_PER_KM2
}

/// Converts exactly the designated columns; every other column passes through.
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    designated: &'static [&'static str],
}

impl UnitConverter {
    pub const fn new(designated: &'static [&'static str]) -> Self {
        Self { designated }
    }

    pub const fn measurements() -> Self {
        Self::new(MEASUREMENT_AREA_COLUMNS)
    }

    pub const fn long_range() -> Self {
        Self::new(LONG_RANGE_AREA_COLUMNS)
    }

    pub fn is_designated(&self, column: &str) -> bool {
        self.designated.contains(&column)
    }

    pub fn apply(&self, column: &str, value: f64) -> f64 {
        if self.is_designated(column) {
            hectares_to_km2(value)
        } else {
            value
        }
    }
}
