//! Table-backed forecasts from the long-range CSV.

use std::sync::Arc;

use super::{ModelFeatures, PredictionError, PredictiveModel};
use crate::data::LongRangeTable;

pub struct TableModel {
    table: Arc<LongRangeTable>,
}

impl TableModel {
    pub const fn new(table: Arc<LongRangeTable>) -> Self {
        Self { table }
    }
}

impl PredictiveModel for TableModel {
    fn name(&self) -> &'static str {
        "long_range_table"
    }

    fn predict(&self, features: &ModelFeatures, year: i32) -> Result<f64, PredictionError> {
        let Some(row) = self.table.get(&features.country) else {
            return Err(match self.table.rejection(&features.country) {
                Some(issue) => PredictionError::RejectedRow(issue.clone()),
                None => PredictionError::UnknownCountry(features.country.clone()),
            });
        };
        row.values
            .get(&year)
            .copied()
            .ok_or_else(|| PredictionError::MissingYear {
                country: features.country.clone(),
                year,
            })
    }
}
