//! Chronological train/test partitioning by calendar year.

use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;

/// Disjoint year-bounded partitions of a feature table.
///
/// `train` holds every row with year <= boundary, `test` every row with
/// year == boundary + 1. Rows beyond boundary + 1 belong to neither partition;
/// the test set is exactly one calendar year, not all future rows.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Rows with year <= boundary
    pub train: FeatureTable,
    /// Rows with year == boundary + 1
    pub test: FeatureTable,
    /// The boundary year Y
    pub boundary_year: i32,
}

/// Partition a feature table at the given boundary year.
///
/// Fails with `DataError` when either partition would be empty, since a run
/// without both partitions can neither fit nor evaluate.
pub fn split_by_year(table: &FeatureTable, boundary_year: i32) -> Result<TrainTestSplit> {
    let mut train_idx = Vec::new();
    let mut test_idx = Vec::new();

    for row in 0..table.len() {
        let year = table.year(row);
        if year <= boundary_year {
            train_idx.push(row);
        } else if year == boundary_year + 1 {
            test_idx.push(row);
        }
        // Rows past boundary + 1 are silently excluded.
    }

    if train_idx.is_empty() {
        return Err(ForecastError::DataError(format!(
            "no training rows at or before year {boundary_year}"
        )));
    }
    if test_idx.is_empty() {
        return Err(ForecastError::DataError(format!(
            "no test rows in year {}",
            boundary_year + 1
        )));
    }

    Ok(TrainTestSplit {
        train: table.subset(&train_idx),
        test: table.subset(&test_idx),
        boundary_year,
    })
}

impl TrainTestSplit {
    /// Total number of rows across both partitions
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Check whether both partitions are empty
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }

    /// Train-then-test concatenation, the ordering every prediction frame uses.
    pub fn combined(&self) -> FeatureTable {
        self.train.concat(&self.test)
    }
}
