//! Schedules endpoint integration tests against Postgres

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;

use crate::common::TestApp;

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_schedule_lifecycle() {
    let app = TestApp::new().await.unwrap();
    let user = app.insert_user("alice@acme.test", None).await.unwrap();
    let token = app.token(user);

    let (status, body) = app
        .send(
            Method::POST,
            "/v2/schedules",
            &token,
            Some(json!({"name": "Work", "timeZone": "Europe/Rome", "isDefault": true})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let work = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/v2/schedules",
            &token,
            Some(json!({
                "name": "Evenings",
                "timeZone": "Europe/Rome",
                "isDefault": false,
                "availability": [{"days": ["Monday"], "startTime": "18:00", "endTime": "21:00"}]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let evenings = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["isDefault"], false);

    let (_, body) = app.send(Method::GET, "/v2/schedules", &token, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/v2/schedules/{}", evenings),
            &token,
            Some(json!({"name": "Late", "isDefault": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Late");
    assert_eq!(body["data"]["isDefault"], true);

    let (status, _) = app
        .send(Method::DELETE, &format!("/v2/schedules/{}", evenings), &token, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, "/v2/schedules/default", &token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], work);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_foreign_schedule_is_forbidden() {
    let app = TestApp::new().await.unwrap();
    let owner = app.insert_user("owner@acme.test", None).await.unwrap();
    let other = app.insert_user("other@acme.test", None).await.unwrap();

    let (_, body) = app
        .send(
            Method::POST,
            "/v2/schedules",
            &app.token(owner),
            Some(json!({"name": "Work", "timeZone": "UTC", "isDefault": false})),
        )
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::GET, &format!("/v2/schedules/{}", id), &app.token(other), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/v2/schedules/{}", id), &app.token(other), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
