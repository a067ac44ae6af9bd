//! Rating domain models.

use serde::{Deserialize, Deserializer, Serialize};
use shared::validation::{is_valid_score, normalize_score, normalize_text};

/// Rated aspect of a gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "foodRating")]
    Food,
    #[serde(rename = "locationRating")]
    Location,
    #[serde(rename = "atmosphereRating")]
    Atmosphere,
    #[serde(rename = "membersRating")]
    Members,
    #[serde(rename = "endTimeRating")]
    EndTime,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Location,
        Category::Atmosphere,
        Category::Members,
        Category::EndTime,
    ];

    /// Wire key used in requests and result maps.
    pub fn key(self) -> &'static str {
        match self {
            Category::Food => "foodRating",
            Category::Location => "locationRating",
            Category::Atmosphere => "atmosphereRating",
            Category::Members => "membersRating",
            Category::EndTime => "endTimeRating",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The five category scores of one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryScores {
    pub food: Option<i64>,
    pub location: Option<i64>,
    pub atmosphere: Option<i64>,
    pub members: Option<i64>,
    pub end_time: Option<i64>,
}

impl CategoryScores {
    /// Scores where every category is rated.
    pub fn all(food: i64, location: i64, atmosphere: i64, members: i64, end_time: i64) -> Self {
        Self {
            food: Some(food),
            location: Some(location),
            atmosphere: Some(atmosphere),
            members: Some(members),
            end_time: Some(end_time),
        }
    }

    pub fn get(&self, category: Category) -> Option<i64> {
        match category {
            Category::Food => self.food,
            Category::Location => self.location,
            Category::Atmosphere => self.atmosphere,
            Category::Members => self.members,
            Category::EndTime => self.end_time,
        }
    }

    /// True iff every category holds a score within 1..=5.
    ///
    /// Completeness is decided once at submission and never recomputed.
    pub fn is_complete(&self) -> bool {
        Category::ALL
            .iter()
            .all(|c| self.get(*c).is_some_and(is_valid_score))
    }
}

/// Request to submit a rating.
///
/// Every field is optional and leniently typed, so any JSON object is a
/// request and the lifecycle checks always run before input validation.
/// A score that is not an integer reads as unrated; a nickname or comment
/// that is not a string reads as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub food_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub location_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub atmosphere_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub members_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub end_time_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: Option<String>,
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

impl SubmitRatingRequest {
    /// Category scores with unrated (zero) stars mapped to `None`.
    pub fn scores(&self) -> CategoryScores {
        CategoryScores {
            food: normalize_score(self.food_rating),
            location: normalize_score(self.location_rating),
            atmosphere: normalize_score(self.atmosphere_rating),
            members: normalize_score(self.members_rating),
            end_time: normalize_score(self.end_time_rating),
        }
    }

    /// Trimmed nickname, `None` when missing or blank.
    pub fn nickname(&self) -> Option<String> {
        normalize_text(self.nickname.as_deref())
    }

    /// Trimmed comment, `None` when missing or blank.
    pub fn comment(&self) -> Option<String> {
        normalize_text(self.comment.as_deref())
    }
}

/// Validated rating ready to be stored.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub nickname: String,
    pub scores: CategoryScores,
    pub comment: Option<String>,
    pub is_complete: bool,
}

/// Response after submitting a rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingResponse {
    pub id: String,
    pub is_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_scores() {
        assert!(CategoryScores::all(1, 1, 1, 1, 1).is_complete());
        assert!(CategoryScores::all(5, 4, 3, 2, 1).is_complete());
    }

    #[test]
    fn test_missing_score_is_incomplete() {
        let scores = CategoryScores {
            end_time: None,
            ..CategoryScores::all(5, 4, 3, 2, 1)
        };
        assert!(!scores.is_complete());
        assert!(!CategoryScores::default().is_complete());
    }

    #[test]
    fn test_out_of_range_score_is_incomplete() {
        assert!(!CategoryScores::all(6, 4, 3, 2, 1).is_complete());
        assert!(!CategoryScores::all(5, 4, 3, 2, -1).is_complete());
        assert!(!CategoryScores::all(0, 4, 3, 2, 1).is_complete());
    }

    #[test]
    fn test_category_keys_and_order() {
        let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "foodRating",
                "locationRating",
                "atmosphereRating",
                "membersRating",
                "endTimeRating"
            ]
        );
    }

    #[test]
    fn test_category_serialization_matches_key() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn test_submit_request_from_json() {
        let request: SubmitRatingRequest = serde_json::from_value(serde_json::json!({
            "nickname": "  minji ",
            "foodRating": 5,
            "locationRating": 4,
            "atmosphereRating": 3,
            "membersRating": 2,
            "endTimeRating": 0,
            "comment": "   "
        }))
        .unwrap();

        assert_eq!(request.nickname(), Some("minji".to_string()));
        assert_eq!(request.comment(), None);
        let scores = request.scores();
        assert_eq!(scores.food, Some(5));
        assert_eq!(scores.end_time, None);
        assert!(!scores.is_complete());
    }

    #[test]
    fn test_submit_request_wide_and_mistyped_values() {
        let request: SubmitRatingRequest = serde_json::from_value(serde_json::json!({
            "nickname": 42,
            "foodRating": 9_999_999_999i64,
            "locationRating": "5",
            "atmosphereRating": 4.5,
            "membersRating": null,
            "endTimeRating": 3,
            "comment": ["not", "text"]
        }))
        .unwrap();

        assert_eq!(request.nickname(), None);
        assert_eq!(request.comment(), None);
        let scores = request.scores();
        assert_eq!(scores.food, Some(9_999_999_999));
        assert_eq!(scores.location, None);
        assert_eq!(scores.atmosphere, None);
        assert_eq!(scores.members, None);
        assert_eq!(scores.end_time, Some(3));
        assert!(!scores.is_complete());
    }

    #[test]
    fn test_submit_request_empty_body() {
        let request: SubmitRatingRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.nickname(), None);
        assert_eq!(request.scores(), CategoryScores::default());
    }

    #[test]
    fn test_submit_response_serialization() {
        let response = SubmitRatingResponse {
            id: "zz99yy88".to_string(),
            is_complete: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], "zz99yy88");
        assert_eq!(json["isComplete"], true);
    }
}
