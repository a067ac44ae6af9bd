//! Integration tests for creating, reading and searching gatherings.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{
    create_test_app, fake_title, gathering_status, get_request, insert_complete_rating,
    insert_gathering, json_request, parse_response_body, setup, unique_tag, TestGathering,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_gathering_returns_short_id() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(pool.clone());

    let request = json_request(
        Method::POST,
        "/api/gatherings",
        json!({
            "title": fake_title(&unique_tag()),
            "date": "2026-12-24T19:00",
            "location": "강남역",
            "maxParticipants": 6,
            "deadline": ""
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert!(shared::id::is_short_id(&id));

    let app = create_test_app(pool.clone());
    let response = app
        .oneshot(get_request(&format!("/api/gatherings/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["location"], "강남역");
    assert_eq!(body["maxParticipants"], 6);
    assert_eq!(body["status"], "active");
    assert_eq!(body["currentParticipants"], 0);
    assert!(body["deadline"].is_null());
    // Entered at +09:00
    assert_eq!(body["date"], "2026-12-24T10:00:00Z");
}

#[tokio::test]
async fn test_create_gathering_trims_text() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(pool.clone());

    let request = json_request(
        Method::POST,
        "/api/gatherings",
        json!({
            "title": "  송년회  ",
            "date": "2026-12-24T19:00:00+09:00",
            "location": " 홍대 ",
            "maxParticipants": 3,
            "deadline": "2026-12-25T12:00"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = parse_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let app = create_test_app(pool);
    let response = app
        .oneshot(get_request(&format!("/api/gatherings/{}", id)))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["title"], "송년회");
    assert_eq!(body["location"], "홍대");
    assert_eq!(body["deadline"], "2026-12-25T03:00:00Z");
}

#[tokio::test]
async fn test_create_gathering_missing_fields() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(pool);

    let request = json_request(
        Method::POST,
        "/api/gatherings",
        json!({
            "title": "   ",
            "date": "2026-12-24T19:00",
            "maxParticipants": 4
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "필수 항목을 모두 입력해주세요.");
}

#[tokio::test]
async fn test_create_gathering_invalid_capacity() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(pool);

    let request = json_request(
        Method::POST,
        "/api/gatherings",
        json!({
            "title": "점심 모임",
            "date": "2026-12-24T12:00",
            "location": "판교",
            "maxParticipants": 0
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "참여 인원은 1명 이상이어야 합니다.");
}

#[tokio::test]
async fn test_create_gathering_invalid_dates() {
    let Some(pool) = setup().await else { return };

    let app = create_test_app(pool.clone());
    let request = json_request(
        Method::POST,
        "/api/gatherings",
        json!({
            "title": "점심 모임",
            "date": "next friday",
            "location": "판교",
            "maxParticipants": 4
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "모임 날짜 형식이 올바르지 않습니다.");

    let app = create_test_app(pool);
    let request = json_request(
        Method::POST,
        "/api/gatherings",
        json!({
            "title": "점심 모임",
            "date": "2026-12-24T12:00",
            "location": "판교",
            "maxParticipants": 4,
            "deadline": "soon"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "평가 마감 시간 형식이 올바르지 않습니다.");
}

#[tokio::test]
async fn test_create_gathering_malformed_body() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(pool);

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/gatherings")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "요청 형식이 올바르지 않습니다.");
}

#[tokio::test]
async fn test_get_gathering_not_found() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(pool);

    let response = app
        .oneshot(get_request("/api/gatherings/zzzzzzzz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "평가를 찾을 수 없습니다.");
}

#[tokio::test]
async fn test_get_gathering_closes_after_deadline() {
    let Some(pool) = setup().await else { return };
    let id = insert_gathering(
        &pool,
        &TestGathering::new().with_deadline(Utc::now() - Duration::minutes(1)),
    )
    .await;

    let app = create_test_app(pool.clone());
    let response = app
        .oneshot(get_request(&format!("/api/gatherings/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "closed");
    assert_eq!(gathering_status(&pool, &id).await, "closed");
}

#[tokio::test]
async fn test_get_gathering_closes_when_full() {
    let Some(pool) = setup().await else { return };
    let id = insert_gathering(&pool, &TestGathering::new().with_max_participants(2)).await;
    insert_complete_rating(&pool, &id, None).await;
    insert_complete_rating(&pool, &id, None).await;

    let app = create_test_app(pool.clone());
    let response = app
        .oneshot(get_request(&format!("/api/gatherings/{}", id)))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "closed");
    assert_eq!(body["currentParticipants"], 2);
    assert_eq!(gathering_status(&pool, &id).await, "closed");
}

#[tokio::test]
async fn test_search_by_title_newest_first() {
    let Some(pool) = setup().await else { return };
    let tag = unique_tag();
    let now = Utc::now();

    let older = insert_gathering(
        &pool,
        &TestGathering::new()
            .with_title(&format!("첫 회식 {}", tag))
            .created_at(now - Duration::hours(2)),
    )
    .await;
    let newer = insert_gathering(
        &pool,
        &TestGathering::new()
            .with_title(&format!("두번째 회식 {}", tag.to_uppercase()))
            .created_at(now - Duration::hours(1)),
    )
    .await;
    insert_gathering(&pool, &TestGathering::new()).await;

    let app = create_test_app(pool);
    let response = app
        .oneshot(get_request(&format!("/api/gatherings?q={}", tag)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], newer);
    assert_eq!(results[1]["id"], older);
    assert!(results[0]["title"].is_string());
    assert!(results[0]["status"].is_string());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let Some(pool) = setup().await else { return };
    let tag = unique_tag();

    let literal = insert_gathering(
        &pool,
        &TestGathering::new().with_title(&format!("할인 {}%", tag)),
    )
    .await;
    insert_gathering(&pool, &TestGathering::new().with_title(&format!("할인 {}", tag))).await;

    let app = create_test_app(pool);
    let response = app
        .oneshot(get_request(&format!("/api/gatherings?q={}%25", tag)))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], literal);
}

#[tokio::test]
async fn test_search_without_query_lists_newest() {
    let Some(pool) = setup().await else { return };
    let newest = insert_gathering(
        &pool,
        &TestGathering::new().created_at(Utc::now() + Duration::days(365)),
    )
    .await;

    let app = create_test_app(pool);
    let response = app
        .oneshot(get_request("/api/gatherings?q=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let results = body.as_array().unwrap();
    assert!(!results.is_empty());
    assert!(results.len() <= 10);
    assert_eq!(results[0]["id"], newest);
}

#[tokio::test]
async fn test_search_returns_at_most_ten() {
    let Some(pool) = setup().await else { return };
    let tag = unique_tag();
    let now = Utc::now();

    let mut ids = Vec::new();
    for minutes in 0..12 {
        let id = insert_gathering(
            &pool,
            &TestGathering::new()
                .with_title(&fake_title(&tag))
                .created_at(now - Duration::minutes(60 - minutes)),
        )
        .await;
        ids.push(id);
    }
    // Newest first
    ids.reverse();

    let app = create_test_app(pool);
    let response = app
        .oneshot(get_request(&format!("/api/gatherings?q={}", tag)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let returned: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();
    assert_eq!(returned.len(), 10);
    assert_eq!(returned, ids[..10].iter().map(String::as_str).collect::<Vec<_>>());
}
