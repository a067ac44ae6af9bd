//! Common validation utilities.

use validator::ValidationError;

/// Lowest accepted star score.
pub const MIN_SCORE: i64 = 1;

/// Highest accepted star score.
pub const MAX_SCORE: i64 = 5;

/// Returns true if the score lies within the star range (1 to 5).
pub fn is_valid_score(score: i64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Validates that a text field contains something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("필수 항목을 모두 입력해주세요.".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Trims optional free text, mapping blank input to `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Treats a zero score as "not rated".
///
/// The rating widget reports 0 for an untouched row of stars.
pub fn normalize_score(score: Option<i64>) -> Option<i64> {
    score.filter(|s| *s != 0)
}
