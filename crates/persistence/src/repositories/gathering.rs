//! Gathering repository for database operations.

use domain::models::NewGathering;
use sqlx::{PgConnection, PgPool};

use crate::entities::{GatheringEntity, GatheringSummaryEntity};
use crate::metrics::QueryTimer;

const MAX_ID_ATTEMPTS: usize = 100;

/// Repository for gathering-related database operations.
#[derive(Clone)]
pub struct GatheringRepository {
    pool: PgPool,
}

impl GatheringRepository {
    /// Creates a new GatheringRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new gathering with status `active`.
    pub async fn create(
        &self,
        id: &str,
        gathering: &NewGathering,
    ) -> Result<GatheringEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_gathering");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            INSERT INTO gatherings (id, title, date, location, max_participants, deadline, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'active')
            RETURNING id, title, date, location, max_participants, deadline, status, created_at
            "#,
        )
        .bind(id)
        .bind(&gathering.title)
        .bind(gathering.date)
        .bind(&gathering.location)
        .bind(gathering.max_participants)
        .bind(gathering.deadline)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a gathering by ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<GatheringEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gathering_by_id");
        let result = sqlx::query_as::<_, GatheringEntity>(
            r#"
            SELECT id, title, date, location, max_participants, deadline, status, created_at
            FROM gatherings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Search gatherings by case-insensitive title substring, newest first.
    ///
    /// `None` returns the newest gatherings. `%` and `_` in the query match
    /// literally.
    pub async fn search(
        &self,
        query: Option<&str>,
        limit: i64,
    ) -> Result<Vec<GatheringSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("search_gatherings");
        let pattern = query.map(escape_like);
        let result = sqlx::query_as::<_, GatheringSummaryEntity>(
            r#"
            SELECT id, title, date, location, status
            FROM gatherings
            WHERE ($1::TEXT IS NULL OR title ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persist the `closed` status.
    ///
    /// Returns `true` only if this call performed the transition.
    pub async fn close(&self, id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("close_gathering");
        let mut conn = self.pool.acquire().await?;
        let result = mark_closed(&mut conn, id).await;
        timer.record();
        result
    }

    /// Check if a gathering ID is already taken.
    pub async fn id_exists(&self, id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("gathering_id_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM gatherings WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate a gathering ID that is not yet in use.
    pub async fn generate_unique_id<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generator();
            if !self.id_exists(&id).await? {
                return Ok(id);
            }
            tracing::debug!(id = %id, "Gathering id collision, retrying");
        }
        Err(sqlx::Error::Protocol(
            "Could not generate unique gathering id after 100 attempts".to_string(),
        ))
    }
}

/// Monotone `active -> closed` update on an existing connection.
pub(crate) async fn mark_closed(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gatherings
        SET status = 'closed'
        WHERE id = $1 AND status = 'active'
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Escapes LIKE wildcards so user input matches literally.
///
/// Backslash is PostgreSQL's default LIKE escape character.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
