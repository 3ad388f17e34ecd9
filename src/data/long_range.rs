//! Companion long-range forecast table (`forest_predictions_2011_2075.csv`).
//!
//! One row per country: `country`, `area` (hectares), then one column per
//! year holding the forecast forest-cover percentage. Blank cells mean the
//! forecast is absent for that year; they are kept absent, not zero-filled.

use csv::{ReaderBuilder, Trim};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::loader::COUNTRY_COLUMN;
use super::units::UnitConverter;
use super::{DataError, DataQualityIssue};
use crate::config::defaults::{BASELINE_YEAR, SERIES_END_YEAR};
use crate::types::country_key;

/// Forecast values for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRangeRow {
    pub name: String,
    /// Total area (km²), when the table carries it
    pub area_km2: Option<f64>,
    /// Forecast forest cover (%) by year
    pub values: BTreeMap<i32, f64>,
}

#[derive(Debug, Default)]
pub struct LongRangeTable {
    rows: HashMap<String, LongRangeRow>,
    /// First rejection per country key
    rejected: HashMap<String, DataQualityIssue>,
    issues: Vec<DataQualityIssue>,
    source: Option<PathBuf>,
}

impl LongRangeTable {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut table = Self::read(BufReader::new(file), path)?;
        table.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            countries = table.len(),
            rejected = table.issues.len(),
            "Long-range forecast table loaded"
        );
        Ok(table)
    }

    pub fn read<R: Read>(reader: R, path: &Path) -> Result<Self, DataError> {
        let converter = UnitConverter::long_range();
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let country_idx = headers
            .iter()
            .position(|h| h == COUNTRY_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: COUNTRY_COLUMN.to_string(),
            })?;
        let area_idx = headers.iter().position(|h| h == "area");
        let year_columns: Vec<(usize, i32)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.parse::<i32>().ok().map(|y| (i, y)))
            .filter(|(_, y)| (BASELINE_YEAR..=SERIES_END_YEAR).contains(y))
            .collect();

        let mut table = Self::default();
        for result in rdr.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) if e.is_io_error() => {
                    return Err(DataError::Csv {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    table.issues.push(DataQualityIssue {
                        line: e.position().map_or(0, csv::Position::line),
                        country: None,
                        column: None,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let line = record.position().map_or(0, csv::Position::line);
            let name = record.get(country_idx).unwrap_or_default().to_string();
            if name.is_empty() {
                table.issues.push(DataQualityIssue {
                    line,
                    country: None,
                    column: Some(COUNTRY_COLUMN.to_string()),
                    reason: "missing country name".to_string(),
                });
                continue;
            }

            let row = parse_row(&record, line, name, area_idx, &year_columns, converter);

            match row {
                Ok(row) => {
                    table.rows.entry(country_key(&row.name)).or_insert(row);
                }
                Err(issue) => {
                    warn!(%issue, "Rejecting long-range row");
                    if let Some(ref country) = issue.country {
                        table
                            .rejected
                            .entry(country_key(country))
                            .or_insert_with(|| issue.clone());
                    }
                    table.issues.push(issue);
                }
            }
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&LongRangeRow> {
        self.rows.get(&country_key(name))
    }

    /// Why the row for `name` was rejected, if it was.
    pub fn rejection(&self, name: &str) -> Option<&DataQualityIssue> {
        self.rejected.get(&country_key(name))
    }

    pub fn issues(&self) -> &[DataQualityIssue] {
        &self.issues
    }

    /// File the table was loaded from; `None` when read from memory.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_row(
    record: &csv::StringRecord,
    line: u64,
    name: String,
    area_idx: Option<usize>,
    year_columns: &[(usize, i32)],
    converter: UnitConverter,
) -> Result<LongRangeRow, DataQualityIssue> {
    let parse = |idx: usize, column: &str| -> Result<Option<f64>, DataQualityIssue> {
        let raw = record.get(idx).unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(converter.apply(column, v))),
            _ => Err(DataQualityIssue {
                line,
                country: Some(name.clone()),
                column: Some(column.to_string()),
                reason: format!("not a number: '{raw}'"),
            }),
        }
    };

    let area_km2 = match area_idx {
        Some(i) => parse(i, "area")?,
        None => None,
    };
    let mut values = BTreeMap::new();
    for &(idx, year) in year_columns {
        if let Some(v) = parse(idx, &year.to_string())? {
            values.insert(year, v);
        }
    }
    Ok(LongRangeRow {
        name,
        area_km2,
        values,
    })
}
