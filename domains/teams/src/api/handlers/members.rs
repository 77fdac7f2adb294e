//! Team membership API handlers
//!
//! Member listing for the console and the `remove-member` RPC, which runs the
//! removal workflow for every (member, team) pair after checking the caller's
//! rights on each team.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use slotline_auth::{scopes, AuthUser};
use slotline_common::{ApiResponse, Error, Pagination, Result, ValidatedJson};
use validator::Validate;

use crate::api::middleware::TeamsState;
use crate::domain::entities::{MemberListQuery, MemberPage, Membership, RemovedMembership};
use crate::removal::{remove_member as run_removal, RemoveMemberInput};
use crate::repository::TeamsStore;

/// Request body for the remove-member RPC
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberRequest {
    #[validate(length(min = 1, max = 100))]
    pub team_ids: Vec<i64>,

    #[validate(length(min = 1, max = 100))]
    pub member_ids: Vec<i64>,

    #[serde(default)]
    pub is_org: bool,
}

/// Search filter for member listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearch {
    pub search_term: Option<String>,
}

/// Caller's membership in a team, or 403
async fn caller_membership(
    store: &dyn TeamsStore,
    team_id: i64,
    user_id: i64,
) -> Result<Membership> {
    store
        .find_membership(team_id, user_id)
        .await?
        .ok_or_else(|| Error::Authorization("Access denied: Not a member of this team".to_string()))
}

/// List members of a team
///
/// **GET /v1/teams/{team_id}/members?offset&limit&searchTerm**
///
/// Any member of the team may list it.
pub async fn list_members(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    Path(team_id): Path<i64>,
    Query(pagination): Query<Pagination>,
    Query(search): Query<MemberSearch>,
) -> Result<ApiResponse<MemberPage>> {
    auth.require_scopes(&[scopes::TEAM_READ])?;
    caller_membership(state.store.as_ref(), team_id, auth.user_id).await?;

    let query = MemberListQuery {
        offset: pagination.offset(),
        limit: pagination.limit(),
        search_term: search.search_term,
    };
    let (rows, total) = state.store.list_members(team_id, &query).await?;

    Ok(ApiResponse::success(MemberPage::new(rows, total, &query)))
}

/// Remove members from teams
///
/// **POST /v1/teams/remove-member**
///
/// Business rules:
/// - The caller must be owner or admin of every listed team
/// - The caller cannot remove themselves
/// - Only owners can remove owners
/// - `isOrg` requires every listed team to be an organization
///
/// Pairs are processed in order; the first failure stops the rest.
pub async fn remove_member(
    AuthUser(auth): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<RemoveMemberRequest>,
) -> Result<ApiResponse<Vec<RemovedMembership>>> {
    auth.require_scopes(&[scopes::TEAM_WRITE])?;
    let store = state.store.as_ref();

    if request.member_ids.contains(&auth.user_id) {
        return Err(Error::Validation(
            "You cannot remove yourself from a team".to_string(),
        ));
    }

    for &team_id in &request.team_ids {
        let acting = caller_membership(store, team_id, auth.user_id).await?;
        if !acting.role.can_admin() {
            return Err(Error::Authorization(
                "Access denied: Must be owner or admin to remove members".to_string(),
            ));
        }

        if request.is_org {
            let team = store
                .find_team(team_id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("Team with id={} not found", team_id)))?;
            if !team.is_organization {
                return Err(Error::Validation(format!(
                    "Team with id={} is not an organization",
                    team_id
                )));
            }
        }

        if !acting.role.is_owner() {
            for &member_id in &request.member_ids {
                let target = store.find_membership(team_id, member_id).await?;
                if target.is_some_and(|m| m.role.is_owner()) {
                    return Err(Error::Authorization(
                        "Only owners can remove owners".to_string(),
                    ));
                }
            }
        }
    }

    let mut removed = Vec::with_capacity(request.member_ids.len() * request.team_ids.len());
    for &member_id in &request.member_ids {
        for &team_id in &request.team_ids {
            let membership = run_removal(
                store,
                RemoveMemberInput {
                    member_id,
                    team_id,
                    is_org: request.is_org,
                },
            )
            .await?;
            removed.push(membership);
        }
    }

    tracing::info!(
        user_id = auth.user_id,
        removed = removed.len(),
        is_org = request.is_org,
        "Members removed"
    );

    Ok(ApiResponse::success(removed))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use slotline_auth::{AccessClaims, AuthBackend, AuthConfig};
    use tower::ServiceExt;

    use super::*;
    use crate::api::routes;
    use crate::domain::entities::{MembershipRole, Team, User};
    use crate::repository::InMemoryTeamsStore;

    const SECRET: &str = "teams-handler-secret";
    const ORG: i64 = 1;
    const TEAM: i64 = 2;
    const OWNER: i64 = 10;
    const ADMIN: i64 = 11;
    const MEMBER: i64 = 12;
    const CO_OWNER: i64 = 13;

    fn seeded_store() -> InMemoryTeamsStore {
        let store = InMemoryTeamsStore::new();
        store.insert_team(Team::organization(ORG, "Acme"));
        store.insert_team(Team::new(TEAM, "Standalone"));

        let users = [
            (OWNER, "owner@acme.test", MembershipRole::Owner),
            (ADMIN, "admin@acme.test", MembershipRole::Admin),
            (MEMBER, "member@acme.test", MembershipRole::Member),
            (CO_OWNER, "co-owner@acme.test", MembershipRole::Owner),
        ];
        for (id, email, role) in users {
            store.insert_user(User {
                organization_id: Some(ORG),
                ..User::new(id, email)
            });
            store.add_membership(id, ORG, role);
            store.add_membership(id, TEAM, role);
        }
        store
    }

    fn router(store: InMemoryTeamsStore) -> Router {
        routes().with_state(TeamsState {
            store: Arc::new(store),
            auth: AuthBackend::new(AuthConfig {
                jwt_secret: SECRET.to_string(),
                issuer: None,
                audience: None,
            }),
        })
    }

    fn token(user_id: i64) -> String {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: None,
            iat: now,
            exp: now + 3600,
            aud: "authenticated".to_string(),
            scopes: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn remove_request(caller: i64, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/v1/teams/remove-member")
            .header("authorization", format!("Bearer {}", token(caller)))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn list_request(caller: i64, query: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/v1/teams/{}/members{}", ORG, query))
            .header("authorization", format!("Bearer {}", token(caller)))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_admin_removes_member_from_org() {
        let store = seeded_store();
        let router = router(store.clone());

        let (status, body) = call(
            &router,
            remove_request(ADMIN, json!({"teamIds": [ORG], "memberIds": [MEMBER], "isOrg": true})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"][0]["userId"], MEMBER);
        assert_eq!(body["data"][0]["team"]["isOrganization"], true);
        assert_eq!(body["data"][0]["user"]["email"], "member@acme.test");

        let data = store.snapshot();
        assert!(data.membership(MEMBER, ORG).is_none());
        assert_eq!(data.users[&MEMBER].organization_id, None);
    }

    #[tokio::test]
    async fn test_member_cannot_remove_others() {
        let store = seeded_store();
        let router = router(store.clone());

        let (status, body) = call(
            &router,
            remove_request(MEMBER, json!({"teamIds": [ORG], "memberIds": [ADMIN], "isOrg": true})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], "error");
        assert!(store.snapshot().membership(ADMIN, ORG).is_some());
    }

    #[tokio::test]
    async fn test_cannot_remove_self() {
        let router = router(seeded_store());
        let (status, _) = call(
            &router,
            remove_request(OWNER, json!({"teamIds": [ORG], "memberIds": [OWNER], "isOrg": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_only_owner_removes_owner() {
        let store = seeded_store();
        let router = router(store.clone());

        let (status, _) = call(
            &router,
            remove_request(ADMIN, json!({"teamIds": [ORG], "memberIds": [CO_OWNER], "isOrg": true})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(store.snapshot().membership(CO_OWNER, ORG).is_some());

        let (status, _) = call(
            &router,
            remove_request(OWNER, json!({"teamIds": [ORG], "memberIds": [CO_OWNER], "isOrg": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.snapshot().membership(CO_OWNER, ORG).is_none());
    }

    #[tokio::test]
    async fn test_is_org_on_plain_team_rejected() {
        let router = router(seeded_store());
        let (status, _) = call(
            &router,
            remove_request(OWNER, json!({"teamIds": [TEAM], "memberIds": [MEMBER], "isOrg": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_plain_team_removal_keeps_organization() {
        let store = seeded_store();
        let router = router(store.clone());

        let (status, body) = call(
            &router,
            remove_request(OWNER, json!({"teamIds": [TEAM], "memberIds": [MEMBER, ADMIN]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        let data = store.snapshot();
        assert!(data.membership(MEMBER, TEAM).is_none());
        assert!(data.membership(ADMIN, TEAM).is_none());
        assert!(data.membership(MEMBER, ORG).is_some());
        assert_eq!(data.users[&MEMBER].organization_id, Some(ORG));
    }

    #[tokio::test]
    async fn test_first_failure_stops_remaining_pairs() {
        let store = seeded_store();
        let router = router(store.clone());

        // 999 has no membership, so the second pair fails and the third never runs
        let (status, _) = call(
            &router,
            remove_request(
                OWNER,
                json!({"teamIds": [TEAM], "memberIds": [MEMBER, 999, ADMIN], "isOrg": false}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let data = store.snapshot();
        assert!(data.membership(MEMBER, TEAM).is_none());
        assert!(data.membership(ADMIN, TEAM).is_some());
    }

    #[tokio::test]
    async fn test_empty_member_list_rejected() {
        let router = router(seeded_store());
        let (status, _) = call(
            &router,
            remove_request(OWNER, json!({"teamIds": [ORG], "memberIds": [], "isOrg": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_members_paginates() {
        let router = router(seeded_store());

        let (status, body) = call(&router, list_request(MEMBER, "?limit=3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"]["meta"]["totalRowCount"], 4);
        assert_eq!(body["data"]["nextCursor"], 3);

        let (_, body) = call(&router, list_request(MEMBER, "?limit=3&offset=3")).await;
        assert_eq!(body["data"]["rows"][0]["id"], CO_OWNER);
        assert_eq!(body["data"]["nextCursor"], Value::Null);
    }

    #[tokio::test]
    async fn test_list_members_search() {
        let router = router(seeded_store());

        let (_, body) = call(&router, list_request(OWNER, "?searchTerm=co-owner")).await;
        assert_eq!(body["data"]["meta"]["totalRowCount"], 1);
        assert_eq!(body["data"]["rows"][0]["email"], "co-owner@acme.test");
        assert_eq!(body["data"]["rows"][0]["role"], "owner");
    }

    #[tokio::test]
    async fn test_list_members_requires_membership() {
        let router = router(seeded_store());
        let (status, _) = call(&router, list_request(999, "")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
