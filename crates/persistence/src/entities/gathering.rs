//! Gathering entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Gathering, GatheringStatus, GatheringSummary};
use domain::services::LifecycleState;
use sqlx::FromRow;

/// Database enum for gathering_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gathering_status", rename_all = "lowercase")]
pub enum GatheringStatusDb {
    Active,
    Closed,
}

impl From<GatheringStatusDb> for GatheringStatus {
    fn from(db_status: GatheringStatusDb) -> Self {
        match db_status {
            GatheringStatusDb::Active => GatheringStatus::Active,
            GatheringStatusDb::Closed => GatheringStatus::Closed,
        }
    }
}

/// Database row mapping for the gatherings table.
#[derive(Debug, Clone, FromRow)]
pub struct GatheringEntity {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub status: GatheringStatusDb,
    pub created_at: DateTime<Utc>,
}

impl GatheringEntity {
    /// The fields the lifecycle rules look at.
    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState {
            status: self.status.into(),
            deadline: self.deadline,
            max_participants: self.max_participants,
        }
    }
}

impl From<GatheringEntity> for Gathering {
    fn from(entity: GatheringEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            date: entity.date,
            location: entity.location,
            max_participants: entity.max_participants,
            deadline: entity.deadline,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}

/// Columns returned by title search.
#[derive(Debug, Clone, FromRow)]
pub struct GatheringSummaryEntity {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub status: GatheringStatusDb,
}

impl From<GatheringSummaryEntity> for GatheringSummary {
    fn from(entity: GatheringSummaryEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            date: entity.date,
            location: entity.location,
            status: entity.status.into(),
        }
    }
}
