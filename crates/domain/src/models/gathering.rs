//! Gathering domain models.
//!
//! A gathering is one rating session created by an organizer and shared by
//! link. It accepts ratings while `active` and becomes `closed` for good once
//! its deadline passes or enough complete ratings arrive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::time::parse_timestamp;
use validator::Validate;

use crate::errors::InvalidGathering;

/// Lifecycle state of a gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatheringStatus {
    Active,
    Closed,
}

impl GatheringStatus {
    /// Closed is terminal.
    pub fn is_closed(self) -> bool {
        matches!(self, GatheringStatus::Closed)
    }
}

impl std::fmt::Display for GatheringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatheringStatus::Active => write!(f, "active"),
            GatheringStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Represents a gathering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gathering {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub status: GatheringStatus,
    pub created_at: DateTime<Utc>,
}

/// Gathering with the number of complete ratings received so far.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringDetail {
    #[serde(flatten)]
    pub gathering: Gathering,
    pub current_participants: i64,
}

/// Request to create a new gathering.
///
/// Every field is optional at the JSON level so a missing field yields a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatheringRequest {
    #[validate(required(message = "필수 항목을 모두 입력해주세요."))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,

    /// Event date, RFC 3339 or `datetime-local`.
    #[validate(required(message = "필수 항목을 모두 입력해주세요."))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub date: Option<String>,

    #[validate(required(message = "필수 항목을 모두 입력해주세요."))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub location: Option<String>,

    #[validate(required(message = "필수 항목을 모두 입력해주세요."))]
    #[validate(range(min = 1, message = "참여 인원은 1명 이상이어야 합니다."))]
    pub max_participants: Option<i32>,

    /// Optional closing time, RFC 3339 or `datetime-local`. Blank means none.
    pub deadline: Option<String>,
}

impl CreateGatheringRequest {
    /// Resolves the request into storable values.
    ///
    /// Call after `validate()`. Offset-less dates are read in
    /// `utc_offset_hours`.
    pub fn to_new_gathering(&self, utc_offset_hours: i32) -> Result<NewGathering, InvalidGathering> {
        let title = required_text(&self.title)?;
        let location = required_text(&self.location)?;
        let max_participants = self
            .max_participants
            .ok_or(InvalidGathering::MissingField)?;
        if max_participants < 1 {
            return Err(InvalidGathering::Capacity);
        }

        let date = self.date.as_deref().ok_or(InvalidGathering::MissingField)?;
        let date = parse_timestamp(date, utc_offset_hours).map_err(InvalidGathering::Date)?;

        let deadline = match self.deadline.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                Some(parse_timestamp(raw, utc_offset_hours).map_err(InvalidGathering::Deadline)?)
            }
        };

        Ok(NewGathering {
            title,
            date,
            location,
            max_participants,
            deadline,
        })
    }
}

fn required_text(value: &Option<String>) -> Result<String, InvalidGathering> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(InvalidGathering::MissingField)
}

/// A validated gathering ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGathering {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub deadline: Option<DateTime<Utc>>,
}

/// Response after creating a gathering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatheringResponse {
    pub id: String,
}

/// Query parameters for searching gatherings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchGatheringsQuery {
    /// Case-insensitive title substring.
    pub q: Option<String>,
}

/// Search result row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatheringSummary {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub status: GatheringStatus,
}
