//! Comment summarization.
//!
//! Comments are only ever sent to the text-generation service, never returned
//! to clients. When the service is not configured or fails, the result is a
//! fixed message that mentions only how many comments exist.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::warn;

/// Message when there is nothing to summarize.
pub const NO_COMMENTS_MESSAGE: &str = "아직 코멘트가 없어 분석할 내용이 없습니다.";

/// Message when the service answered without any text.
pub const MISSING_TEXT_MESSAGE: &str = "분석 결과를 가져올 수 없습니다.";

/// Message for unexpected errors while preparing a summary.
pub const ERROR_MESSAGE: &str = "AI 요약 생성 중 오류가 발생했습니다.";

/// Fallback when no summarization credential is configured.
pub fn not_configured_message(comment_count: usize) -> String {
    format!(
        "총 {}개의 코멘트가 접수되었습니다. AI 분석을 위해 API 키를 설정해주세요.",
        comment_count
    )
}

/// Fallback when the summarization call fails.
pub fn count_message(comment_count: usize) -> String {
    format!("총 {}개의 코멘트가 접수되었습니다.", comment_count)
}

/// Gathering details given to the model as context.
#[derive(Debug, Clone)]
pub struct SummaryContext {
    pub title: String,
    pub location: String,
}

/// Builds the instruction sent to the text-generation service.
///
/// The instruction forbids quoting comments and identifying individuals.
pub fn build_prompt(context: &SummaryContext, comments: &[String]) -> String {
    let numbered = comments
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "다음은 회식 \"{}\" (장소: {})에 대한 익명 참여자들의 코멘트입니다. \
         개별 코멘트 내용을 절대 직접 인용하지 말고, 전체적인 분위기와 느낌만 한두 줄로 요약해주세요. \
         특정 개인을 식별할 수 있는 내용은 제외해주세요.\n\n코멘트들:\n{}\n\n요약:",
        context.title, context.location, numbered
    )
}

/// Result of one call to the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// The service returned text.
    Generated(String),
    /// The call succeeded but the response had no text.
    MissingText,
    /// Network error, timeout or non-success status.
    Failed(String),
}

/// External text-generation capability.
#[async_trait::async_trait]
pub trait SummaryClient: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> GenerationResult;
}

/// How a summary was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    NoComments,
    NotConfigured,
    Generated,
    MissingText,
    Degraded,
    Error,
}

impl std::fmt::Display for SummaryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryOutcome::NoComments => write!(f, "no_comments"),
            SummaryOutcome::NotConfigured => write!(f, "not_configured"),
            SummaryOutcome::Generated => write!(f, "generated"),
            SummaryOutcome::MissingText => write!(f, "missing_text"),
            SummaryOutcome::Degraded => write!(f, "degraded"),
            SummaryOutcome::Error => write!(f, "error"),
        }
    }
}

/// User-facing summary text and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub outcome: SummaryOutcome,
}

impl Summary {
    fn new(text: impl Into<String>, outcome: SummaryOutcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }

    /// Summary used when an unexpected error interrupts the operation.
    pub fn error() -> Self {
        Self::new(ERROR_MESSAGE, SummaryOutcome::Error)
    }
}

/// Summarizes comments, degrading to fixed messages.
///
/// `client` is `None` when no credential is configured; in that case the
/// service is never contacted.
pub async fn summarize_comments(
    context: &SummaryContext,
    comments: &[String],
    client: Option<&dyn SummaryClient>,
) -> Summary {
    if comments.is_empty() {
        return Summary::new(NO_COMMENTS_MESSAGE, SummaryOutcome::NoComments);
    }

    let Some(client) = client else {
        return Summary::new(
            not_configured_message(comments.len()),
            SummaryOutcome::NotConfigured,
        );
    };

    let prompt = build_prompt(context, comments);
    match client.generate(&prompt).await {
        GenerationResult::Generated(text) if !text.trim().is_empty() => {
            Summary::new(text.trim(), SummaryOutcome::Generated)
        }
        GenerationResult::Generated(_) | GenerationResult::MissingText => {
            Summary::new(MISSING_TEXT_MESSAGE, SummaryOutcome::MissingText)
        }
        GenerationResult::Failed(reason) => {
            warn!(reason = %reason, comment_count = comments.len(), "Summary generation failed, using fallback");
            Summary::new(count_message(comments.len()), SummaryOutcome::Degraded)
        }
    }
}

/// Mock summary client for development and testing.
///
/// Returns a canned result and records every prompt it receives.
#[derive(Debug)]
pub struct MockSummaryClient {
    result: GenerationResult,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockSummaryClient {
    /// Mock that answers with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_result(GenerationResult::Generated(text.into()))
    }

    /// Mock that always fails.
    pub fn failing() -> Self {
        Self::with_result(GenerationResult::Failed("simulated failure".to_string()))
    }

    pub fn with_result(result: GenerationResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl SummaryClient for MockSummaryClient {
    async fn generate(&self, prompt: &str) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        self.result.clone()
    }
}
