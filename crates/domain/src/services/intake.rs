//! Rating intake rules.
//!
//! Checks run in a fixed order: deadline, then closed/capacity, then the
//! nickname. A rejected submission may still require the gathering to be
//! persisted as closed, which [`AdmissionDenied::close`] carries.

use chrono::{DateTime, Utc};

use super::lifecycle::{CloseReason, LifecycleDecision, LifecycleState};
use crate::errors::RatingRejection;
use crate::models::rating::{NewRating, SubmitRatingRequest};

/// A refused submission and the transition to persist alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDenied {
    pub rejection: RatingRejection,
    pub close: Option<CloseReason>,
}

/// Decides whether a gathering accepts another rating right now.
pub fn check_admission(
    state: &LifecycleState,
    now: DateTime<Utc>,
    complete_count: i64,
) -> Result<(), AdmissionDenied> {
    let decision = state.evaluate(now, complete_count);
    let close = match decision {
        LifecycleDecision::Close(reason) => Some(reason),
        LifecycleDecision::Unchanged => None,
    };

    // An expired deadline is reported as such even if the gathering
    // had already closed for another reason.
    if state.deadline_passed(now) {
        return Err(AdmissionDenied {
            rejection: RatingRejection::DeadlineExpired,
            close,
        });
    }

    if decision.apply(state.status).is_closed() {
        return Err(AdmissionDenied {
            rejection: RatingRejection::AlreadyClosed,
            close,
        });
    }

    Ok(())
}

/// Validates the request and computes completeness.
pub fn prepare_rating(request: &SubmitRatingRequest) -> Result<NewRating, RatingRejection> {
    let nickname = request.nickname().ok_or(RatingRejection::MissingNickname)?;
    let scores = request.scores();

    Ok(NewRating {
        nickname,
        scores,
        comment: request.comment(),
        is_complete: scores.is_complete(),
    })
}

/// Transition caused by inserting a rating.
///
/// `complete_count_before` is the count observed before the insert.
pub fn close_after_insert(
    state: &LifecycleState,
    complete_count_before: i64,
    is_complete: bool,
) -> Option<CloseReason> {
    if is_complete && state.capacity_reached(complete_count_before + 1) {
        Some(CloseReason::CapacityReached)
    } else {
        None
    }
}
