//! Database entity definitions.

pub mod gathering;
pub mod rating;

pub use gathering::{GatheringEntity, GatheringStatusDb, GatheringSummaryEntity};
pub use rating::RatingEntity;
