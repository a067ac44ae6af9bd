//! Domain error types.

use shared::time::TimestampError;
use thiserror::Error;

/// Reasons a create-gathering request cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGathering {
    #[error("필수 항목을 모두 입력해주세요.")]
    MissingField,

    #[error("참여 인원은 1명 이상이어야 합니다.")]
    Capacity,

    #[error("모임 날짜 형식이 올바르지 않습니다.")]
    Date(#[source] TimestampError),

    #[error("평가 마감 시간 형식이 올바르지 않습니다.")]
    Deadline(#[source] TimestampError),
}

/// Reasons a rating submission is refused.
///
/// The display text is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatingRejection {
    #[error("평가 기한이 종료되었습니다.")]
    DeadlineExpired,

    #[error("평가가 이미 종료되었습니다.")]
    AlreadyClosed,

    #[error("닉네임을 입력해주세요.")]
    MissingNickname,
}

impl RatingRejection {
    /// Stable machine-readable code for logs and metrics.
    pub fn code(self) -> &'static str {
        match self {
            RatingRejection::DeadlineExpired => "deadline_expired",
            RatingRejection::AlreadyClosed => "already_closed",
            RatingRejection::MissingNickname => "missing_nickname",
        }
    }
}
