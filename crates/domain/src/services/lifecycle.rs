//! Gathering lifecycle rules.
//!
//! A gathering moves from `active` to `closed` when its deadline has passed
//! or when the number of complete ratings reaches its capacity. `closed` is
//! terminal: nothing in this module ever yields a transition back to
//! `active`, so the status can be re-derived at any time from the deadline
//! and the complete-rating count.

use chrono::{DateTime, Utc};

use crate::models::gathering::GatheringStatus;

/// Why a gathering closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    DeadlinePassed,
    CapacityReached,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::DeadlinePassed => write!(f, "deadline_passed"),
            CloseReason::CapacityReached => write!(f, "capacity_reached"),
        }
    }
}

/// Outcome of evaluating a gathering's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleDecision {
    /// Status stays as it is (already closed, or still open).
    Unchanged,
    /// Status must be persisted as closed.
    Close(CloseReason),
}

impl LifecycleDecision {
    /// Status after applying the decision to `current`.
    pub fn apply(self, current: GatheringStatus) -> GatheringStatus {
        match self {
            LifecycleDecision::Unchanged => current,
            LifecycleDecision::Close(_) => GatheringStatus::Closed,
        }
    }
}

/// The fields of a gathering the lifecycle depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleState {
    pub status: GatheringStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub max_participants: i32,
}

impl LifecycleState {
    /// True if a deadline exists and `now` is strictly after it.
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }

    /// True if `complete_count` complete ratings fill the gathering.
    pub fn capacity_reached(&self, complete_count: i64) -> bool {
        complete_count >= i64::from(self.max_participants)
    }

    /// Whether the complete-rating count is needed to decide.
    ///
    /// Lets callers skip the count query for closed or expired gatherings.
    pub fn needs_count(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_closed() && !self.deadline_passed(now)
    }

    /// Decides whether the gathering must close.
    ///
    /// Order: closed stays closed, then the deadline, then capacity.
    pub fn evaluate(&self, now: DateTime<Utc>, complete_count: i64) -> LifecycleDecision {
        if self.status.is_closed() {
            return LifecycleDecision::Unchanged;
        }
        if self.deadline_passed(now) {
            return LifecycleDecision::Close(CloseReason::DeadlinePassed);
        }
        if self.capacity_reached(complete_count) {
            return LifecycleDecision::Close(CloseReason::CapacityReached);
        }
        LifecycleDecision::Unchanged
    }
}
