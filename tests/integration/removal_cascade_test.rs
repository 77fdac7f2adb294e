//! Member removal integration tests against Postgres
//!
//! Exercises `POST /v1/teams/remove-member` and the removal workflow through
//! `PgTeamsStore`, checking every table the cascade touches.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use slotline_teams::{remove_member, PgTeamsStore, RemoveMemberInput};

use crate::common::TestApp;

/// Org with one sub-team, an owner and a member moved onto an org profile
struct OrgScenario {
    app: TestApp,
    org: i64,
    sub_team: i64,
    owner: i64,
    alice: i64,
    template: i64,
    alice_copy: i64,
}

impl OrgScenario {
    async fn new() -> anyhow::Result<Self> {
        let app = TestApp::new().await?;

        let org = app.insert_team("Acme", None, true).await?;
        let sub_team = app.insert_team("Acme Sales", Some(org), false).await?;

        let owner = app.insert_user("owner@acme.test", Some("owner")).await?;
        let alice = app.insert_user("alice@acme.test", Some("alice")).await?;

        app.add_membership(owner, org, "owner").await?;
        app.add_membership(alice, org, "member").await?;
        app.add_membership(alice, sub_team, "member").await?;
        app.move_to_org_profile(alice, org, "alice").await?;

        let template = app.add_event_type("Intro call", Some(org), None, None).await?;
        let alice_copy = app
            .add_event_type("Intro call", None, Some(alice), Some(template))
            .await?;
        app.add_host(alice, template).await?;
        app.add_host(owner, template).await?;
        app.add_redirect("alice", org).await?;

        Ok(Self {
            app,
            org,
            sub_team,
            owner,
            alice,
            template,
            alice_copy,
        })
    }

    async fn membership_count(&self, user_id: i64) -> i64 {
        self.app
            .count("SELECT COUNT(*) FROM memberships WHERE user_id = $1", user_id)
            .await
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_org_removal_over_http_cascades() {
    let s = OrgScenario::new().await.unwrap();
    let token = s.app.token(s.owner);

    let (status, body) = s
        .app
        .send(
            Method::POST,
            "/v1/teams/remove-member",
            &token,
            Some(json!({"teamIds": [s.org], "memberIds": [s.alice], "isOrg": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"][0]["userId"], s.alice);
    assert_eq!(body["data"][0]["team"]["isOrganization"], true);

    assert_eq!(s.membership_count(s.alice).await, 0);
    assert_eq!(s.membership_count(s.owner).await, 1);
    assert_eq!(
        s.app
            .count("SELECT COUNT(*) FROM profiles WHERE user_id = $1", s.alice)
            .await,
        0
    );
    assert_eq!(
        s.app
            .count("SELECT COUNT(*) FROM hosts WHERE user_id = $1", s.alice)
            .await,
        0
    );
    assert_eq!(
        s.app
            .count("SELECT COUNT(*) FROM event_types WHERE id = $1", s.alice_copy)
            .await,
        0
    );
    assert_eq!(
        s.app
            .count("SELECT COUNT(*) FROM event_types WHERE id = $1", s.template)
            .await,
        1
    );
    assert_eq!(
        s.app
            .count(
                "SELECT COUNT(*) FROM temp_org_redirects WHERE from_org_id = $1",
                s.org
            )
            .await,
        0
    );

    let (organization_id, moved_to): (Option<i64>, Option<i64>) =
        sqlx::query_as("SELECT organization_id, moved_to_profile_id FROM users WHERE id = $1")
            .bind(s.alice)
            .fetch_one(&s.app.pool)
            .await
            .unwrap();
    assert_eq!(organization_id, None);
    assert_eq!(moved_to, None);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_team_removal_keeps_organization() {
    let s = OrgScenario::new().await.unwrap();
    let store = PgTeamsStore::new(s.app.pool.clone());

    remove_member(
        &store,
        RemoveMemberInput {
            member_id: s.alice,
            team_id: s.sub_team,
            is_org: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(s.membership_count(s.alice).await, 1);
    assert_eq!(
        s.app
            .count("SELECT COUNT(*) FROM profiles WHERE user_id = $1", s.alice)
            .await,
        1
    );
    assert_eq!(
        s.app
            .count("SELECT COUNT(*) FROM temp_org_redirects WHERE from_org_id = $1", s.org)
            .await,
        1
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_missing_membership_is_not_found() {
    let s = OrgScenario::new().await.unwrap();
    let store = PgTeamsStore::new(s.app.pool.clone());

    let err = remove_member(
        &store,
        RemoveMemberInput {
            member_id: s.owner,
            team_id: s.sub_team,
            is_org: false,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(s.membership_count(s.alice).await, 2);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_member_cannot_remove_others() {
    let s = OrgScenario::new().await.unwrap();
    let token = s.app.token(s.alice);

    let (status, body) = s
        .app
        .send(
            Method::POST,
            "/v1/teams/remove-member",
            &token,
            Some(json!({"teamIds": [s.org], "memberIds": [s.owner], "isOrg": true})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "error");
    assert_eq!(s.membership_count(s.owner).await, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_member_listing_reflects_removal() {
    let s = OrgScenario::new().await.unwrap();
    let token = s.app.token(s.owner);
    let uri = format!("/v1/teams/{}/members?limit=10", s.org);

    let (status, body) = s.app.send(Method::GET, &uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["totalRowCount"], 2);

    s.app
        .send(
            Method::POST,
            "/v1/teams/remove-member",
            &token,
            Some(json!({"teamIds": [s.org], "memberIds": [s.alice], "isOrg": true})),
        )
        .await;

    let (_, body) = s.app.send(Method::GET, &uri, &token, None).await;
    assert_eq!(body["data"]["meta"]["totalRowCount"], 1);
    assert_eq!(body["data"]["rows"][0]["id"], s.owner);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Postgres database (TEST_DATABASE_URL)"]
async fn test_member_search_treats_wildcards_literally() {
    let s = OrgScenario::new().await.unwrap();
    let bob = s.app.insert_user("bob_smith@acme.test", None).await.unwrap();
    let carol = s.app.insert_user("bobxsmith@acme.test", None).await.unwrap();
    s.app.add_membership(bob, s.org, "member").await.unwrap();
    s.app.add_membership(carol, s.org, "member").await.unwrap();
    let token = s.app.token(s.owner);

    let uri = format!("/v1/teams/{}/members?limit=10&searchTerm=bob_smith", s.org);
    let (status, body) = s.app.send(Method::GET, &uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["totalRowCount"], 1);
    assert_eq!(body["data"]["rows"][0]["id"], bob);

    let uri = format!("/v1/teams/{}/members?limit=10&searchTerm=%25", s.org);
    let (_, body) = s.app.send(Method::GET, &uri, &token, None).await;
    assert_eq!(body["data"]["meta"]["totalRowCount"], 0);
}
