//! Dataset Module
//!
//! Loads the FAO measurement table into an immutable in-memory [`DataStore`]
//! and the companion long-range forecast table into a [`LongRangeTable`].
//!
//! ## Loading Rules
//!
//! - Area columns are converted from hectares to km² at load time
//!   (see [`units::UnitConverter`]); every area leaving this module is km².
//! - A row with a missing or malformed numeric field, or one that breaks a
//!   physical invariant, is rejected as a data-quality issue. Values are never
//!   coerced to zero or filled with a column median.
//! - Exact duplicate rows are dropped; a second row for the same country with
//!   different values is rejected.
//!
//! The store is built once in `main()` and shared behind an `Arc`. It exposes
//! no mutating methods after construction.

pub mod loader;
pub mod long_range;
pub mod store;
pub mod units;

pub use long_range::{LongRangeRow, LongRangeTable};
pub use store::DataStore;
pub use units::UnitConverter;

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A row rejected during loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataQualityIssue {
    /// 1-based line in the source file (header is line 1)
    pub line: u64,
    /// Country named on the row, when it could be read
    pub country: Option<String>,
    /// Offending column, when the problem is field-specific
    pub column: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)?;
        if let Some(ref c) = self.country {
            write!(f, " ({c})")?;
        }
        if let Some(ref col) = self.column {
            write!(f, " column '{col}'")?;
        }
        write!(f, ": {}", self.reason)
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{count} row(s) failed data-quality checks in {path}; first: {first}")]
    StrictRejected {
        path: PathBuf,
        count: usize,
        first: DataQualityIssue,
    },

    #[error("Data quality: {0}")]
    Quality(DataQualityIssue),

    #[error("Country not found: {0}")]
    NotFound(String),
}
