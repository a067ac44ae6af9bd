//! Repository implementations for database operations.

pub mod gathering;
pub mod rating;

pub use gathering::GatheringRepository;
pub use rating::{RatingRepository, SubmissionOutcome};
