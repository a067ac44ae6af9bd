//! Application services and external integrations.

pub mod anthropic;
pub mod gatherings;

pub use anthropic::AnthropicSummaryClient;
pub use gatherings::GatheringService;
