//! Derived change figures: 2000 to 2010 deltas and country rankings.

pub mod delta;
pub mod rankings;

pub use delta::{delta, ChangeLabel, CountryDeltas, Delta};
pub use rankings::{top_deforestation, top_reforestation, RankedCountry};
