//! 2000 minus 2010 change, positive meaning forest was lost.

use serde::Serialize;

use crate::types::CountryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeLabel {
    /// Forest lost between 2000 and 2010 (positive delta)
    Deforestation,
    /// Forest gained (negative delta)
    Reforestation,
    NoChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    pub value: f64,
    pub label: ChangeLabel,
}

/// `value_2000 - value_2010`, labelled by sign.
pub fn delta(value_2000: f64, value_2010: f64) -> Delta {
    let value = value_2000 - value_2010;
    let label = if value > 0.0 {
        ChangeLabel::Deforestation
    } else if value < 0.0 {
        ChangeLabel::Reforestation
    } else {
        ChangeLabel::NoChange
    };
    Delta { value, label }
}

/// Both deltas of one country.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountryDeltas {
    /// Percentage points
    pub percent: Delta,
    /// km²
    pub area_km2: Delta,
}

impl From<&CountryRecord> for CountryDeltas {
    fn from(r: &CountryRecord) -> Self {
        Self {
            percent: delta(r.cover_2000_percent, r.cover_2010_percent),
            area_km2: delta(r.cover_2000_km2, r.cover_2010_km2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_is_deforestation() {
        let d = delta(5.0, 3.0);
        assert_eq!(d.value, 2.0);
        assert_eq!(d.label, ChangeLabel::Deforestation);
    }

    #[test]
    fn test_gain_is_reforestation() {
        let d = delta(3.0, 5.0);
        assert_eq!(d.value, -2.0);
        assert_eq!(d.label, ChangeLabel::Reforestation);
    }

    #[test]
    fn test_equal_is_no_change() {
        let d = delta(4.0, 4.0);
        assert_eq!(d.value, 0.0);
        assert_eq!(d.label, ChangeLabel::NoChange);
    }

    #[test]
    fn test_country_deltas_in_both_units() {
        let r = CountryRecord {
            name: "Ireland".to_string(),
            area_km2: 68_890.0,
            cover_2000_km2: 6_350.0,
            cover_2000_percent: 9.2,
            cover_2010_km2: 7_370.0,
            cover_2010_percent: 10.7,
            extra: Default::default(),
        };
        let d = CountryDeltas::from(&r);
        assert_eq!(d.area_km2.value, -1_020.0);
        assert_eq!(d.area_km2.label, ChangeLabel::Reforestation);
        assert_eq!(d.percent.label, ChangeLabel::Reforestation);
    }

    #[test]
    fn test_label_serializes_snake_case() {
        let v = serde_json::to_value(delta(1.0, 1.0)).unwrap();
        assert_eq!(v["label"], "no_change");
    }
}
