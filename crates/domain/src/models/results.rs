//! Aggregated rating results.

use serde::Serialize;

use super::gathering::GatheringDetail;
use super::rating::Category;

/// Per-category averages, rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverages {
    pub food_rating: f64,
    pub location_rating: f64,
    pub atmosphere_rating: f64,
    pub members_rating: f64,
    pub end_time_rating: f64,
}

impl CategoryAverages {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Food => self.food_rating,
            Category::Location => self.location_rating,
            Category::Atmosphere => self.atmosphere_rating,
            Category::Members => self.members_rating,
            Category::EndTime => self.end_time_rating,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        match category {
            Category::Food => self.food_rating = value,
            Category::Location => self.location_rating = value,
            Category::Atmosphere => self.atmosphere_rating = value,
            Category::Members => self.members_rating = value,
            Category::EndTime => self.end_time_rating = value,
        }
    }
}

/// Response for GET /api/gatherings/:id/results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringResults {
    pub gathering: GatheringDetail,
    pub averages: CategoryAverages,
    pub overall_average: f64,
    pub total_ratings: i64,
}

/// Response for GET /api/gatherings/:id/ai-summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}
