//! Gathering and rating routes.
//!
//! None of these routes require authentication; knowing a gathering's id is
//! enough to rate it and read its results.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::gathering::{
    CreateGatheringRequest, CreateGatheringResponse, GatheringDetail, GatheringSummary,
    SearchGatheringsQuery,
};
use domain::models::rating::{SubmitRatingRequest, SubmitRatingResponse};
use domain::models::{GatheringResults, SummaryResponse};
use tracing::debug;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Create a gathering.
///
/// POST /api/gatherings
pub async fn create_gathering(
    State(state): State<AppState>,
    payload: Result<Json<CreateGatheringRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateGatheringResponse>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let gathering = state
        .gathering_service()
        .create(&request, state.config.gatherings.timezone_offset_hours)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGatheringResponse { id: gathering.id }),
    ))
}

/// Search gatherings by title.
///
/// GET /api/gatherings?q=
pub async fn search_gatherings(
    State(state): State<AppState>,
    Query(query): Query<SearchGatheringsQuery>,
) -> Result<Json<Vec<GatheringSummary>>, ApiError> {
    let results = state
        .gathering_service()
        .search(query.q.as_deref(), state.config.gatherings.search_limit)
        .await?;

    debug!(count = results.len(), "Gathering search completed");
    Ok(Json(results))
}

/// Get a gathering with its participant count.
///
/// GET /api/gatherings/:id
pub async fn get_gathering(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GatheringDetail>, ApiError> {
    let detail = state.gathering_service().get_detail(&id, Utc::now()).await?;
    Ok(Json(detail))
}

/// Submit a rating.
///
/// POST /api/gatherings/:id/ratings
pub async fn submit_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SubmitRatingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitRatingResponse>), ApiError> {
    // A malformed body is reported only once the gathering admits ratings
    let request = payload.map(|Json(request)| request).map_err(ApiError::from);

    let response = state
        .gathering_service()
        .submit_rating(&id, request, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Aggregated results.
///
/// GET /api/gatherings/:id/results
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GatheringResults>, ApiError> {
    let results = state
        .gathering_service()
        .compute_results(&id, Utc::now())
        .await?;
    Ok(Json(results))
}

/// Comment summary.
///
/// GET /api/gatherings/:id/ai-summary
///
/// Always 200 for an existing gathering, even when summarization fails.
pub async fn get_ai_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.gathering_service().summarize(&id).await?;
    Ok(Json(SummaryResponse {
        summary: summary.text,
    }))
}
