//! Domain services.
//!
//! Services contain business logic that operates on domain models.

pub mod aggregation;
pub mod intake;
pub mod lifecycle;
pub mod summary;

pub use aggregation::{aggregate, round_one_decimal, Aggregate};
pub use intake::{check_admission, close_after_insert, prepare_rating, AdmissionDenied};
pub use lifecycle::{CloseReason, LifecycleDecision, LifecycleState};
pub use summary::{
    summarize_comments, GenerationResult, MockSummaryClient, Summary, SummaryClient,
    SummaryContext, SummaryOutcome,
};
