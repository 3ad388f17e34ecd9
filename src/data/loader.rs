//! Measurement table reader.
//!
//! Parses `Deforestation.csv`-shaped input into [`CountryRecord`]s, applying
//! the hectare conversion and rejecting rows that fail data-quality checks.
//!
//! `delta_percent` and `delta_area` are optional. When present and non-blank
//! they must parse and agree with the anchors (`delta_area` after hectare
//! conversion); the stored record keeps only the anchors.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use super::units::UnitConverter;
use super::{DataError, DataQualityIssue};
use crate::config::defaults::{
    COVER_AREA_ABSOLUTE_TOLERANCE_KM2, COVER_AREA_RELATIVE_TOLERANCE, DELTA_PERCENT_TOLERANCE,
    PERCENT_TOLERANCE,
};
use crate::types::CountryRecord;

pub const COUNTRY_COLUMN: &str = "country";

/// Columns every measurement table must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COUNTRY_COLUMN,
    "area",
    "two_thousand_percent",
    "two_thousand_area",
    "two_thousand_ten_percent",
    "two_thousand_ten_area",
];

/// Columns derived from the anchors. Checked at load, recomputed on demand.
pub const DERIVED_COLUMNS: &[&str] = &["delta_percent", "delta_area"];

/// Outcome of reading one measurement table.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<CountryRecord>,
    pub issues: Vec<DataQualityIssue>,
    pub duplicates_dropped: usize,
}

/// Header positions resolved once per file.
struct Columns {
    country: usize,
    area: usize,
    percent_2000: usize,
    area_2000: usize,
    percent_2010: usize,
    area_2010: usize,
    delta_percent: Option<usize>,
    delta_area: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self, DataError> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |column: &str| {
            names
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DataError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        };

        let extra = names
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                !h.is_empty()
                    && !REQUIRED_COLUMNS.contains(&h.as_str())
                    && !DERIVED_COLUMNS.contains(&h.as_str())
            })
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(Self {
            country: find(COUNTRY_COLUMN)?,
            area: find("area")?,
            percent_2000: find("two_thousand_percent")?,
            area_2000: find("two_thousand_area")?,
            percent_2010: find("two_thousand_ten_percent")?,
            area_2010: find("two_thousand_ten_area")?,
            delta_percent: names.iter().position(|h| h == "delta_percent"),
            delta_area: names.iter().position(|h| h == "delta_area"),
            extra,
        })
    }
}

/// Read a measurement table from any reader. `path` is used for error context.
pub fn read_measurements<R: Read>(reader: R, path: &Path) -> Result<LoadReport, DataError> {
    let converter = UnitConverter::measurements();
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let columns = Columns::resolve(&headers, path)?;

    let mut report = LoadReport::default();
    let mut seen_rows: HashSet<Vec<String>> = HashSet::new();
    let mut seen_keys: HashSet<String> = HashSet::new();

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
                let line = e.position().map_or(0, csv::Position::line);
                warn!(line, error = %e, "Rejecting malformed CSV row");
                report.issues.push(DataQualityIssue {
                    line,
                    country: None,
                    column: None,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let line = record.position().map_or(0, csv::Position::line);
        let raw: Vec<String> = record.iter().map(str::to_string).collect();
        if !seen_rows.insert(raw) {
            debug!(line, "Dropping exact duplicate row");
            report.duplicates_dropped += 1;
            continue;
        }

        match parse_row(&record, &columns, converter, line) {
            Ok(parsed) => {
                if !seen_keys.insert(parsed.key()) {
                    let issue = DataQualityIssue {
                        line,
                        country: Some(parsed.name),
                        column: Some(COUNTRY_COLUMN.to_string()),
                        reason: "conflicting duplicate country row; first occurrence kept"
                            .to_string(),
                    };
                    warn!(%issue, "Rejecting row");
                    report.issues.push(issue);
                    continue;
                }
                report.records.push(parsed);
            }
            Err(issue) => {
                warn!(%issue, "Rejecting row");
                report.issues.push(issue);
            }
        }
    }

    Ok(report)
}

fn parse_row(
    record: &StringRecord,
    columns: &Columns,
    converter: UnitConverter,
    line: u64,
) -> Result<CountryRecord, DataQualityIssue> {
    let name = record.get(columns.country).unwrap_or_default().to_string();
    let issue = |column: Option<&str>, reason: String| DataQualityIssue {
        line,
        country: (!name.is_empty()).then(|| name.clone()),
        column: column.map(str::to_string),
        reason,
    };

    if name.is_empty() {
        return Err(issue(Some(COUNTRY_COLUMN), "missing country name".to_string()));
    }

    let field = |idx: usize, column: &str| -> Result<f64, DataQualityIssue> {
        let raw = record.get(idx).unwrap_or_default();
        if raw.is_empty() {
            return Err(issue(Some(column), "missing value".to_string()));
        }
        let value: f64 = raw
            .parse()
            .map_err(|_| issue(Some(column), format!("not a number: '{raw}'")))?;
        if !value.is_finite() {
            return Err(issue(Some(column), format!("non-finite value: '{raw}'")));
        }
        Ok(converter.apply(column, value))
    };

    let parsed = CountryRecord {
        name: name.clone(),
        area_km2: field(columns.area, "area")?,
        cover_2000_percent: field(columns.percent_2000, "two_thousand_percent")?,
        cover_2000_km2: field(columns.area_2000, "two_thousand_area")?,
        cover_2010_percent: field(columns.percent_2010, "two_thousand_ten_percent")?,
        cover_2010_km2: field(columns.area_2010, "two_thousand_ten_area")?,
        extra: columns
            .extra
            .iter()
            .filter_map(|(i, h)| record.get(*i).map(|v| (h.clone(), v.to_string())))
            .collect::<BTreeMap<_, _>>(),
    };

    validate_record(&parsed).map_err(|(column, reason)| issue(Some(column), reason))?;

    let published = |idx: Option<usize>, column: &str| -> Result<Option<f64>, DataQualityIssue> {
        match idx {
            Some(i) if !record.get(i).unwrap_or_default().is_empty() => field(i, column).map(Some),
            _ => Ok(None),
        }
    };
    let delta_percent = published(columns.delta_percent, "delta_percent")?;
    let delta_area = published(columns.delta_area, "delta_area")?;
    check_deltas(&parsed, delta_percent, delta_area)
        .map_err(|(column, reason)| issue(Some(column), reason))?;
    Ok(parsed)
}

/// Compare published deltas with the ones implied by the anchors.
fn check_deltas(
    r: &CountryRecord,
    delta_percent: Option<f64>,
    delta_area_km2: Option<f64>,
) -> Result<(), (&'static str, String)> {
    if let Some(published) = delta_percent {
        let expected = r.cover_2000_percent - r.cover_2010_percent;
        if (published - expected).abs() > DELTA_PERCENT_TOLERANCE {
            return Err((
                "delta_percent",
                format!("delta {published} disagrees with anchors ({expected})"),
            ));
        }
    }
    if let Some(published) = delta_area_km2 {
        let expected = r.cover_2000_km2 - r.cover_2010_km2;
        let slack = r.area_km2 * COVER_AREA_RELATIVE_TOLERANCE + COVER_AREA_ABSOLUTE_TOLERANCE_KM2;
        if (published - expected).abs() > slack {
            return Err((
                "delta_area",
                format!("delta {published} km2 disagrees with anchors ({expected} km2)"),
            ));
        }
    }
    Ok(())
}

/// Check the physical invariants of a converted record.
///
/// Returns the offending column and a reason on the first violation.
pub fn validate_record(r: &CountryRecord) -> Result<(), (&'static str, String)> {
    let areas = [
        ("area", r.area_km2),
        ("two_thousand_area", r.cover_2000_km2),
        ("two_thousand_ten_area", r.cover_2010_km2),
    ];
    for (column, value) in areas {
        if value < 0.0 {
            return Err((column, format!("negative area: {value} km2")));
        }
    }

    let limit = r.area_km2 * (1.0 + COVER_AREA_RELATIVE_TOLERANCE) + COVER_AREA_ABSOLUTE_TOLERANCE_KM2;
    for (column, cover) in [
        ("two_thousand_area", r.cover_2000_km2),
        ("two_thousand_ten_area", r.cover_2010_km2),
    ] {
        if cover > limit {
            return Err((
                column,
                format!("forest cover {cover} km2 exceeds total area {} km2", r.area_km2),
            ));
        }
    }

    for (column, percent) in [
        ("two_thousand_percent", r.cover_2000_percent),
        ("two_thousand_ten_percent", r.cover_2010_percent),
    ] {
        if !(-PERCENT_TOLERANCE..=100.0 + PERCENT_TOLERANCE).contains(&percent) {
            return Err((column, format!("percentage {percent} outside 0-100")));
        }
    }

    Ok(())
}
