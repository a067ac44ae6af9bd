//! Aggregation of complete ratings into display averages.
//!
//! Each category average is rounded to one decimal. The overall average is
//! the mean of the five rounded category averages, not of the raw scores,
//! and is rounded the same way. With no ratings every value is `0`.

use crate::models::rating::{Category, CategoryScores};
use crate::models::results::CategoryAverages;

/// Result of aggregating a set of complete ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub averages: CategoryAverages,
    pub overall_average: f64,
    pub count: i64,
}

/// Rounds to one decimal place, ties away from zero.
///
/// Scores are never negative, so this behaves as round-half-up.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregates complete ratings.
///
/// A missing score contributes 0; callers pass only complete ratings, so this
/// only matters for rows written outside the intake path.
pub fn aggregate(ratings: &[CategoryScores]) -> Aggregate {
    let count = ratings.len();
    let mut averages = CategoryAverages::default();

    if count == 0 {
        return Aggregate {
            averages,
            overall_average: 0.0,
            count: 0,
        };
    }

    for category in Category::ALL {
        let sum: i64 = ratings
            .iter()
            .map(|r| r.get(category).unwrap_or(0))
            .sum();
        averages.set(category, round_one_decimal(sum as f64 / count as f64));
    }

    let overall_sum: f64 = Category::ALL.iter().map(|c| averages.get(*c)).sum();
    let overall_average = round_one_decimal(overall_sum / Category::ALL.len() as f64);

    Aggregate {
        averages,
        overall_average,
        count: count as i64,
    }
}
