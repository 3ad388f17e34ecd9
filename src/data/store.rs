//! Immutable in-memory country table.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::loader::{read_measurements, LoadReport};
use super::{DataError, DataQualityIssue};
use crate::types::{country_key, CountryRecord};

/// Cleaned, unit-converted measurement table.
///
/// Constructed once at startup; every accessor takes `&self`, so the store can
/// be shared across request tasks behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct DataStore {
    records: Vec<CountryRecord>,
    index: HashMap<String, usize>,
    issues: Vec<DataQualityIssue>,
    /// Rejected rows that named a country, by lookup key
    rejected: HashMap<String, usize>,
    duplicates_dropped: usize,
    source: Option<PathBuf>,
}

impl DataStore {
    /// Load the measurement table from `path`.
    ///
    /// With `strict` set, any rejected row fails the whole load.
    pub fn load(path: &Path, strict: bool) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let report = read_measurements(BufReader::new(file), path)?;

        if strict {
            if let Some(first) = report.issues.first() {
                return Err(DataError::StrictRejected {
                    path: path.to_path_buf(),
                    count: report.issues.len(),
                    first: first.clone(),
                });
            }
        }

        let mut store = Self::from_report(report);
        store.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            countries = store.len(),
            rejected = store.issues.len(),
            duplicates = store.duplicates_dropped,
            "Measurement table loaded"
        );
        if !store.issues.is_empty() {
            warn!(
                rejected = store.issues.len(),
                "Some rows failed data-quality checks; lookups for them report DATA_QUALITY"
            );
        }
        Ok(store)
    }

    pub fn from_report(report: LoadReport) -> Self {
        let mut store = Self::from_records(report.records);
        store.duplicates_dropped = report.duplicates_dropped;
        for (i, issue) in report.issues.iter().enumerate() {
            if let Some(ref name) = issue.country {
                store.rejected.entry(country_key(name)).or_insert(i);
            }
        }
        store.issues = report.issues;
        store
    }

    /// Build a store directly from already-converted records.
    ///
    /// Later records with a duplicate key are ignored.
    pub fn from_records(records: Vec<CountryRecord>) -> Self {
        let mut store = Self::default();
        for record in records {
            let key = record.key();
            if store.index.contains_key(&key) {
                continue;
            }
            store.index.insert(key, store.records.len());
            store.records.push(record);
        }
        store
    }

    /// Case-insensitive lookup.
    ///
    /// A country whose row was rejected at load answers `DataError::Quality`
    /// rather than `NotFound`.
    pub fn get(&self, name: &str) -> Result<&CountryRecord, DataError> {
        let key = country_key(name);
        if let Some(&i) = self.index.get(&key) {
            return Ok(&self.records[i]);
        }
        if let Some(&i) = self.rejected.get(&key) {
            return Err(DataError::Quality(self.issues[i].clone()));
        }
        Err(DataError::NotFound(name.trim().to_string()))
    }

    /// Records in source order.
    pub fn countries(&self) -> impl Iterator<Item = &CountryRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn issues(&self) -> &[DataQualityIssue] {
        &self.issues
    }

    pub const fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
