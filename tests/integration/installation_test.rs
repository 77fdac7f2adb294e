//! App installation integration tests against Postgres

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use slotline_apps::{
    assert_installed, create_default_installation, is_app_installed, InstallationArgs,
    PgCredentialStore,
};

use crate::common::TestApp;

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_default_installation_roundtrip() {
    let app = TestApp::new().await.unwrap();
    let user = app.insert_user("alice@acme.test", None).await.unwrap();
    let store = PgCredentialStore::new(app.pool.clone());

    assert!(!is_app_installed(&store, "zoom", user).await.unwrap());
    assert_installed(&store, "zoom", user).await.unwrap();

    let credential = create_default_installation(
        &store,
        InstallationArgs {
            app_type: "zoom_video".to_string(),
            user_id: user,
            slug: "zoom".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(credential.user_id, Some(user));
    assert_eq!(credential.team_id, None);
    assert_eq!(credential.key.0, json!({}));
    assert!(is_app_installed(&store, "zoom", user).await.unwrap());

    let err = assert_installed(&store, "zoom", user).await.unwrap_err();
    assert!(err.to_string().contains("Already installed"));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_install_endpoint() {
    let app = TestApp::new().await.unwrap();
    let user = app.insert_user("bob@acme.test", None).await.unwrap();
    let token = app.token(user);

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/apps/google-calendar/install",
            &token,
            Some(json!({"appType": "google_calendar", "key": {"refresh_token": "r"}})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["type"], "google_calendar");
    assert!(body["data"].get("key").is_none());

    let (status, _) = app
        .send(
            Method::POST,
            "/v1/apps/google-calendar/install",
            &token,
            Some(json!({"appType": "google_calendar"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(Method::GET, "/v1/apps/google-calendar/installed", &token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["installed"], true);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_team_install_requires_team_admin() {
    let app = TestApp::new().await.unwrap();
    let team = app.insert_team("Acme", None, true).await.unwrap();
    let admin = app.insert_user("admin@acme.test", None).await.unwrap();
    let member = app.insert_user("member@acme.test", None).await.unwrap();
    let outsider = app.insert_user("outsider@acme.test", None).await.unwrap();
    app.add_membership(admin, team, "admin").await.unwrap();
    app.add_membership(member, team, "member").await.unwrap();

    for user in [outsider, member] {
        let (status, body) = app
            .send(
                Method::POST,
                "/v1/apps/zoom/install",
                &app.token(user),
                Some(json!({"appType": "zoom_video", "teamId": team})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{body}");
    }
    assert_eq!(
        app.count("SELECT COUNT(*) FROM credentials WHERE team_id = $1", team)
            .await,
        0
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/apps/zoom/install",
            &app.token(admin),
            Some(json!({"appType": "zoom_video", "teamId": team})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["teamId"], team);
    assert_eq!(
        app.count("SELECT COUNT(*) FROM credentials WHERE team_id = $1", team)
            .await,
        1
    );
}
