//! Top deforestation / reforestation countries by percent delta.

use serde::Serialize;
use std::cmp::Ordering;

use super::delta::{CountryDeltas, ChangeLabel};
use crate::data::DataStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCountry {
    pub rank: usize,
    pub country: String,
    pub area_km2: f64,
    pub cover_2000_percent: f64,
    pub cover_2010_percent: f64,
    pub delta: CountryDeltas,
}

fn ranked(store: &DataStore, label: ChangeLabel, limit: usize) -> Vec<RankedCountry> {
    let mut hits: Vec<_> = store
        .countries()
        .map(|r| (r, CountryDeltas::from(r)))
        .filter(|(_, d)| d.percent.label == label)
        .collect();

    // Largest magnitude first; ties keep source order.
    hits.sort_by(|(_, a), (_, b)| {
        b.percent
            .value
            .abs()
            .partial_cmp(&a.percent.value.abs())
            .unwrap_or(Ordering::Equal)
    });

    hits.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (r, d))| RankedCountry {
            rank: i + 1,
            country: r.name.clone(),
            area_km2: r.area_km2,
            cover_2000_percent: r.cover_2000_percent,
            cover_2010_percent: r.cover_2010_percent,
            delta: d,
        })
        .collect()
}

/// Countries that lost forest share, biggest loss first.
pub fn top_deforestation(store: &DataStore, limit: usize) -> Vec<RankedCountry> {
    ranked(store, ChangeLabel::Deforestation, limit)
}

/// Countries that gained forest share, biggest gain first.
pub fn top_reforestation(store: &DataStore, limit: usize) -> Vec<RankedCountry> {
    ranked(store, ChangeLabel::Reforestation, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CountryRecord;

    fn store() -> DataStore {
        let rows = [
            ("Brazil", 65.3, 62.2),
            ("Spain", 35.1, 37.1),
            ("Nigeria", 18.9, 9.9),
            ("Chile", 21.3, 21.3),
            ("Ireland", 9.2, 10.7),
            ("Honduras", 58.0, 46.4),
        ];
        DataStore::from_records(
            rows.iter()
                .map(|&(n, p0, p1)| CountryRecord {
                    name: n.to_string(),
                    area_km2: 1_000.0,
                    cover_2000_km2: p0 * 10.0,
                    cover_2000_percent: p0,
                    cover_2010_km2: p1 * 10.0,
                    cover_2010_percent: p1,
                    extra: Default::default(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_deforestation_ordered_by_loss() {
        let top = top_deforestation(&store(), 10);
        let names: Vec<_> = top.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Honduras", "Nigeria", "Brazil"]);
        assert_eq!(top[0].rank, 1);
        assert!(top.iter().all(|r| r.delta.percent.value > 0.0));
    }

    #[test]
    fn test_reforestation_ordered_by_gain() {
        let top = top_reforestation(&store(), 10);
        let names: Vec<_> = top.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Spain", "Ireland"]);
    }

    #[test]
    fn test_limit_and_no_change_excluded() {
        assert_eq!(top_deforestation(&store(), 1).len(), 1);
        let all: Vec<_> = top_deforestation(&store(), 100)
            .into_iter()
            .chain(top_reforestation(&store(), 100))
            .map(|r| r.country)
            .collect();
        assert!(!all.contains(&"Chile".to_string()));
    }
}
