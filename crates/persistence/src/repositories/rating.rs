//! Rating repository for database operations.

use chrono::{DateTime, Utc};
use domain::errors::RatingRejection;
use domain::models::SubmitRatingRequest;
use domain::services::{check_admission, close_after_insert, prepare_rating, CloseReason};
use sqlx::{PgConnection, PgPool};

use super::gathering::mark_closed;
use crate::entities::{GatheringEntity, RatingEntity};
use crate::metrics::QueryTimer;

const MAX_ID_ATTEMPTS: usize = 100;

/// Result of a submission attempt.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    GatheringNotFound,
    /// Nothing was inserted. `closed` is set if the gathering was closed
    /// by this attempt.
    Rejected {
        rejection: RatingRejection,
        closed: Option<CloseReason>,
    },
    Created {
        rating: RatingEntity,
        closed: Option<CloseReason>,
    },
    /// The gathering admits ratings but there was no readable request.
    /// Nothing was inserted.
    Unreadable,
}

/// Repository for rating-related database operations.
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Creates a new RatingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of complete ratings for a gathering.
    pub async fn count_complete(&self, gathering_id: &str) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_complete_ratings");
        let mut conn = self.pool.acquire().await?;
        let result = count_complete_on(&mut conn, gathering_id).await;
        timer.record();
        result
    }

    /// All complete ratings for a gathering, oldest first.
    pub async fn find_complete(&self, gathering_id: &str) -> Result<Vec<RatingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_complete_ratings");
        let result = sqlx::query_as::<_, RatingEntity>(
            r#"
            SELECT id, gathering_id, nickname, food_rating, location_rating, atmosphere_rating,
                   members_rating, end_time_rating, comment, is_complete, created_at
            FROM ratings
            WHERE gathering_id = $1 AND is_complete = true
            ORDER BY created_at ASC
            "#,
        )
        .bind(gathering_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Non-blank comments of complete ratings, oldest first.
    pub async fn find_complete_comments(
        &self,
        gathering_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("find_complete_comments");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT comment
            FROM ratings
            WHERE gathering_id = $1
              AND is_complete = true
              AND comment IS NOT NULL
              AND btrim(comment) <> ''
            ORDER BY created_at ASC
            "#,
        )
        .bind(gathering_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Admit and store a rating atomically.
    ///
    /// The gathering row is locked for the whole transaction, so concurrent
    /// submissions to one gathering are serialized and the complete-rating
    /// count can never exceed capacity. Any close caused by the attempt is
    /// committed together with it.
    ///
    /// `request` is `None` when the body could not be read. Lookup and
    /// admission still run, so lifecycle errors take precedence.
    pub async fn submit(
        &self,
        gathering_id: &str,
        request: Option<&SubmitRatingRequest>,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, sqlx::Error> {
        let timer = QueryTimer::new("submit_rating");
        let mut tx = self.pool.begin().await?;

        let gathering = sqlx::query_as::<_, GatheringEntity>(
            r#"
            SELECT id, title, date, location, max_participants, deadline, status, created_at
            FROM gatherings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(gathering_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(gathering) = gathering else {
            timer.record();
            return Ok(SubmissionOutcome::GatheringNotFound);
        };

        let state = gathering.lifecycle_state();
        let count_before = if state.needs_count(now) {
            count_complete_on(&mut tx, gathering_id).await?
        } else {
            0
        };

        if let Err(denied) = check_admission(&state, now, count_before) {
            if denied.close.is_some() {
                mark_closed(&mut tx, gathering_id).await?;
            }
            tx.commit().await?;
            timer.record();
            return Ok(SubmissionOutcome::Rejected {
                rejection: denied.rejection,
                closed: denied.close,
            });
        }

        let Some(request) = request else {
            tx.commit().await?;
            timer.record();
            return Ok(SubmissionOutcome::Unreadable);
        };

        let new_rating = match prepare_rating(request) {
            Ok(rating) => rating,
            Err(rejection) => {
                timer.record();
                return Ok(SubmissionOutcome::Rejected {
                    rejection,
                    closed: None,
                });
            }
        };

        let id = unused_rating_id(&mut tx).await?;
        let rating = sqlx::query_as::<_, RatingEntity>(
            r#"
            INSERT INTO ratings (id, gathering_id, nickname, food_rating, location_rating,
                                 atmosphere_rating, members_rating, end_time_rating, comment, is_complete)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, gathering_id, nickname, food_rating, location_rating, atmosphere_rating,
                      members_rating, end_time_rating, comment, is_complete, created_at
            "#,
        )
        .bind(&id)
        .bind(gathering_id)
        .bind(&new_rating.nickname)
        .bind(new_rating.scores.food)
        .bind(new_rating.scores.location)
        .bind(new_rating.scores.atmosphere)
        .bind(new_rating.scores.members)
        .bind(new_rating.scores.end_time)
        .bind(&new_rating.comment)
        .bind(new_rating.is_complete)
        .fetch_one(&mut *tx)
        .await?;

        let closed = close_after_insert(&state, count_before, new_rating.is_complete);
        if closed.is_some() {
            mark_closed(&mut tx, gathering_id).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(SubmissionOutcome::Created { rating, closed })
    }
}

async fn count_complete_on(conn: &mut PgConnection, gathering_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM ratings
        WHERE gathering_id = $1 AND is_complete = true
        "#,
    )
    .bind(gathering_id)
    .fetch_one(conn)
    .await
}

async fn unused_rating_id(conn: &mut PgConnection) -> Result<String, sqlx::Error> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = shared::id::generate_short_id();
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM ratings WHERE id = $1)
            "#,
        )
        .bind(&id)
        .fetch_one(&mut *conn)
        .await?;
        if !taken {
            return Ok(id);
        }
    }
    Err(sqlx::Error::Protocol(
        "Could not generate unique rating id after 100 attempts".to_string(),
    ))
}
