//! Integration tests for aggregated results.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, fake_nickname, get_request, insert_complete_rating, insert_gathering,
    json_request, parse_response_body, rating_body, setup, TestGathering,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn submit(pool: &PgPool, id: &str, body: serde_json::Value) {
    let app = create_test_app(pool.clone());
    let response = app
        .oneshot(json_request(
            Method::POST,
            &format!("/api/gatherings/{}/ratings", id),
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn results(pool: &PgPool, id: &str) -> (StatusCode, serde_json::Value) {
    let app = create_test_app(pool.clone());
    let response = app
        .oneshot(get_request(&format!("/api/gatherings/{}/results", id)))
        .await
        .unwrap();
    let status = response.status();
    (status, parse_response_body(response).await)
}

#[tokio::test]
async fn test_results_without_ratings() {
    let Some(pool) = setup().await else { return };
    let id = insert_gathering(&pool, &TestGathering::new()).await;

    let (status, body) = results(&pool, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRatings"], 0);
    assert_eq!(body["overallAverage"], 0.0);
    assert_eq!(body["averages"]["foodRating"], 0.0);
    assert_eq!(body["averages"]["endTimeRating"], 0.0);
    assert_eq!(body["gathering"]["id"], id);
    assert_eq!(body["gathering"]["currentParticipants"], 0);
}

#[tokio::test]
async fn test_results_rounded_averages() {
    let Some(pool) = setup().await else { return };
    let id = insert_gathering(&pool, &TestGathering::new().with_max_participants(10)).await;

    submit(&pool, &id, rating_body(fake_nickname(), [5, 5, 5, 5, 5], None)).await;
    submit(&pool, &id, rating_body(fake_nickname(), [4, 4, 4, 4, 4], None)).await;
    submit(&pool, &id, rating_body(fake_nickname(), [4, 3, 2, 1, 5], None)).await;
    // Incomplete, excluded from every average
    submit(&pool, &id, json!({ "nickname": fake_nickname(), "foodRating": 1 })).await;

    let (status, body) = results(&pool, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRatings"], 3);
    assert_eq!(body["gathering"]["currentParticipants"], 3);

    let averages = &body["averages"];
    assert_eq!(averages["foodRating"], 4.3);
    assert_eq!(averages["locationRating"], 4.0);
    assert_eq!(averages["atmosphereRating"], 3.7);
    assert_eq!(averages["membersRating"], 3.3);
    assert_eq!(averages["endTimeRating"], 4.7);
    assert_eq!(body["overallAverage"], 4.0);
}

#[tokio::test]
async fn test_results_close_full_gathering() {
    let Some(pool) = setup().await else { return };
    let id = insert_gathering(&pool, &TestGathering::new().with_max_participants(2)).await;
    insert_complete_rating(&pool, &id, None).await;
    insert_complete_rating(&pool, &id, None).await;

    let (status, body) = results(&pool, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gathering"]["status"], "closed");
    assert_eq!(body["totalRatings"], 2);
    assert_eq!(body["averages"]["membersRating"], 4.0);
}

#[tokio::test]
async fn test_results_unknown_gathering() {
    let Some(pool) = setup().await else { return };

    let (status, body) = results(&pool, "zzzzzzzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "평가를 찾을 수 없습니다.");
}
