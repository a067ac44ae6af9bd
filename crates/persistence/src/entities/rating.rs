//! Rating entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::CategoryScores;
use sqlx::FromRow;

/// Database row mapping for the ratings table.
#[derive(Debug, Clone, FromRow)]
pub struct RatingEntity {
    pub id: String,
    pub gathering_id: String,
    pub nickname: String,
    pub food_rating: Option<i64>,
    pub location_rating: Option<i64>,
    pub atmosphere_rating: Option<i64>,
    pub members_rating: Option<i64>,
    pub end_time_rating: Option<i64>,
    pub comment: Option<String>,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl RatingEntity {
    pub fn scores(&self) -> CategoryScores {
        CategoryScores {
            food: self.food_rating,
            location: self.location_rating,
            atmosphere: self.atmosphere_rating,
            members: self.members_rating,
            end_time: self.end_time_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores() {
        let entity = RatingEntity {
            id: "r0000001".to_string(),
            gathering_id: "g0000001".to_string(),
            nickname: "막내".to_string(),
            food_rating: Some(5),
            location_rating: Some(4),
            atmosphere_rating: None,
            members_rating: Some(3),
            end_time_rating: Some(2),
            comment: None,
            is_complete: false,
            created_at: Utc::now(),
        };
        let scores = entity.scores();
        assert!(!scores.is_complete());
        assert_eq!(scores.food, Some(5));
        assert_eq!(scores.atmosphere, None);
    }
}
