//! Gathering service.
//!
//! Orchestrates repositories and domain rules for the gathering endpoints.
//! Every read of a gathering re-evaluates its lifecycle first, so a stored
//! `active` status is never trusted without checking the deadline and the
//! complete-rating count.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::models::rating::SubmitRatingResponse;
use domain::models::{
    CreateGatheringRequest, GatheringDetail, GatheringResults, GatheringSummary,
    SubmitRatingRequest,
};
use domain::services::{
    aggregate, summarize_comments, CloseReason, LifecycleDecision, Summary, SummaryClient,
    SummaryContext,
};
use persistence::entities::{GatheringEntity, GatheringStatusDb};
use persistence::repositories::{GatheringRepository, RatingRepository, SubmissionOutcome};
use sqlx::PgPool;
use tracing::{error, info};

use crate::error::ApiError;
use crate::middleware::metrics::{
    record_gathering_closed, record_gathering_created, record_rating_rejected,
    record_rating_submitted, record_summary,
};

/// Service for gathering and rating operations.
#[derive(Clone)]
pub struct GatheringService {
    gatherings: GatheringRepository,
    ratings: RatingRepository,
    summary_client: Option<Arc<dyn SummaryClient>>,
}

impl GatheringService {
    pub fn new(pool: PgPool, summary_client: Option<Arc<dyn SummaryClient>>) -> Self {
        Self {
            gatherings: GatheringRepository::new(pool.clone()),
            ratings: RatingRepository::new(pool),
            summary_client,
        }
    }

    /// Create a gathering from a validated request.
    pub async fn create(
        &self,
        request: &CreateGatheringRequest,
        utc_offset_hours: i32,
    ) -> Result<GatheringEntity, ApiError> {
        let new_gathering = request.to_new_gathering(utc_offset_hours)?;
        let id = self
            .gatherings
            .generate_unique_id(shared::id::generate_short_id)
            .await?;

        let gathering = self.gatherings.create(&id, &new_gathering).await?;

        info!(
            gathering_id = %gathering.id,
            max_participants = gathering.max_participants,
            has_deadline = gathering.deadline.is_some(),
            "Gathering created"
        );
        record_gathering_created();

        Ok(gathering)
    }

    /// Title search; a blank query lists the newest gatherings.
    pub async fn search(
        &self,
        query: Option<&str>,
        limit: i64,
    ) -> Result<Vec<GatheringSummary>, ApiError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let rows = self.gatherings.search(query, limit).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Closes the gathering if its deadline passed or its capacity is filled.
    ///
    /// Updates `gathering.status` in place and returns the complete-rating
    /// count when it had to be read.
    pub async fn evaluate_and_close_if_needed(
        &self,
        gathering: &mut GatheringEntity,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, ApiError> {
        let state = gathering.lifecycle_state();
        let count = if state.needs_count(now) {
            Some(self.ratings.count_complete(&gathering.id).await?)
        } else {
            None
        };

        if let LifecycleDecision::Close(reason) = state.evaluate(now, count.unwrap_or(0)) {
            self.persist_close(gathering, reason).await?;
        }

        Ok(count)
    }

    /// Gathering with its current participant count.
    pub async fn get_detail(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<GatheringDetail, ApiError> {
        let mut gathering = self.find(id).await?;
        let count = match self.evaluate_and_close_if_needed(&mut gathering, now).await? {
            Some(count) => count,
            None => self.ratings.count_complete(id).await?,
        };

        Ok(GatheringDetail {
            gathering: gathering.into(),
            current_participants: count,
        })
    }

    /// Admit and store one rating.
    ///
    /// An unreadable request is reported only after the gathering is found
    /// and admits ratings.
    pub async fn submit_rating(
        &self,
        id: &str,
        request: Result<SubmitRatingRequest, ApiError>,
        now: DateTime<Utc>,
    ) -> Result<SubmitRatingResponse, ApiError> {
        let outcome = self.ratings.submit(id, request.as_ref().ok(), now).await?;
        match outcome {
            SubmissionOutcome::GatheringNotFound => Err(ApiError::gathering_not_found()),
            SubmissionOutcome::Rejected { rejection, closed } => {
                if let Some(reason) = closed {
                    log_closed(id, reason);
                }
                info!(gathering_id = %id, reason = rejection.code(), "Rating rejected");
                record_rating_rejected(rejection.code());
                Err(rejection.into())
            }
            SubmissionOutcome::Created { rating, closed } => {
                info!(
                    gathering_id = %id,
                    rating_id = %rating.id,
                    is_complete = rating.is_complete,
                    "Rating submitted"
                );
                record_rating_submitted(rating.is_complete);
                if let Some(reason) = closed {
                    log_closed(id, reason);
                }
                Ok(SubmitRatingResponse {
                    id: rating.id,
                    is_complete: rating.is_complete,
                })
            }
            SubmissionOutcome::Unreadable => Err(request
                .err()
                .unwrap_or_else(|| ApiError::Internal("rating request missing".to_string()))),
        }
    }

    /// Averages over complete ratings.
    pub async fn compute_results(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<GatheringResults, ApiError> {
        let mut gathering = self.find(id).await?;
        self.evaluate_and_close_if_needed(&mut gathering, now).await?;

        let ratings = self.ratings.find_complete(id).await?;
        let scores: Vec<_> = ratings.iter().map(|r| r.scores()).collect();
        let result = aggregate(&scores);

        // The earlier count may be stale; the fetched ratings are authoritative.
        let decision = gathering.lifecycle_state().evaluate(now, result.count);
        if let LifecycleDecision::Close(reason) = decision {
            self.persist_close(&mut gathering, reason).await?;
        }

        Ok(GatheringResults {
            gathering: GatheringDetail {
                gathering: gathering.into(),
                current_participants: result.count,
            },
            averages: result.averages,
            overall_average: result.overall_average,
            total_ratings: result.count,
        })
    }

    /// Summary of complete ratings' comments.
    ///
    /// Only an unknown gathering is an error; every other failure becomes a
    /// fixed message.
    pub async fn summarize(&self, id: &str) -> Result<Summary, ApiError> {
        let gathering = match self.gatherings.find_by_id(id).await {
            Ok(Some(gathering)) => gathering,
            Ok(None) => return Err(ApiError::gathering_not_found()),
            Err(e) => return Ok(summary_error(id, e)),
        };

        let comments = match self.ratings.find_complete_comments(id).await {
            Ok(comments) => comments,
            Err(e) => return Ok(summary_error(id, e)),
        };

        let context = SummaryContext {
            title: gathering.title,
            location: gathering.location,
        };
        let summary =
            summarize_comments(&context, &comments, self.summary_client.as_deref()).await;

        info!(
            gathering_id = %id,
            comment_count = comments.len(),
            outcome = %summary.outcome,
            "Summary prepared"
        );
        record_summary(summary.outcome);

        Ok(summary)
    }

    async fn find(&self, id: &str) -> Result<GatheringEntity, ApiError> {
        self.gatherings
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::gathering_not_found)
    }

    async fn persist_close(
        &self,
        gathering: &mut GatheringEntity,
        reason: CloseReason,
    ) -> Result<(), ApiError> {
        if self.gatherings.close(&gathering.id).await? {
            log_closed(&gathering.id, reason);
        }
        gathering.status = GatheringStatusDb::Closed;
        Ok(())
    }
}

fn log_closed(id: &str, reason: CloseReason) {
    info!(gathering_id = %id, reason = %reason, "Gathering closed");
    record_gathering_closed(reason);
}

fn summary_error(id: &str, err: sqlx::Error) -> Summary {
    error!(gathering_id = %id, error = %err, "Summary generation failed");
    let summary = Summary::error();
    record_summary(summary.outcome);
    summary
}
