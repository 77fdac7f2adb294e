//! Mock remove-member client
//!
//! Records every request for test assertions and either echoes back the
//! removed memberships or fails with a configured error.
//! Thread-safe via `Arc<Mutex<>>`.

use std::sync::{Arc, Mutex};

use slotline_teams::{MemberTeam, MemberUser, MembershipRole, RemovedMembership};

use crate::client::{RemoveMemberClient, RemoveMembersRequest};
use crate::error::ConsoleError;

#[derive(Debug, Clone, Default)]
pub struct MockRemoveMemberClient {
    requests: Arc<Mutex<Vec<RemoveMembersRequest>>>,
    failure: Option<ConsoleError>,
}

impl MockRemoveMemberClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose every call fails with `error`
    pub fn failing(error: ConsoleError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Return all recorded requests.
    pub fn recorded_requests(&self) -> Vec<RemoveMembersRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RemoveMemberClient for MockRemoveMemberClient {
    async fn remove_members(
        &self,
        request: RemoveMembersRequest,
    ) -> Result<Vec<RemovedMembership>, ConsoleError> {
        tracing::debug!(?request, "Mock client: recording remove-member request");
        self.requests
            .lock()
            .map_err(|e| ConsoleError::Request(format!("requests lock poisoned: {e}")))?
            .push(request.clone());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let removed = request
            .member_ids
            .iter()
            .flat_map(|&member_id| {
                request.team_ids.iter().map(move |&team_id| RemovedMembership {
                    id: member_id * 1000 + team_id,
                    user_id: member_id,
                    team_id,
                    role: MembershipRole::Member,
                    accepted: true,
                    user: MemberUser {
                        id: member_id,
                        email: format!("user{}@example.com", member_id),
                        username: None,
                        name: None,
                    },
                    team: MemberTeam {
                        id: team_id,
                        name: format!("Team {}", team_id),
                        slug: None,
                        is_organization: request.is_org,
                    },
                })
            })
            .collect();
        Ok(removed)
    }
}
