//! Domain models for gatherings and ratings.

pub mod gathering;
pub mod rating;
pub mod results;

pub use gathering::{
    CreateGatheringRequest, Gathering, GatheringDetail, GatheringStatus, GatheringSummary,
    NewGathering,
};
pub use rating::{Category, CategoryScores, NewRating, SubmitRatingRequest};
pub use results::{CategoryAverages, GatheringResults, SummaryResponse};
