//! Remove-member RPC client
//!
//! `HttpRemoveMemberClient` POSTs to `{base_url}/v1/teams/remove-member`
//! with the session's bearer token.

use serde::{Deserialize, Serialize};
use slotline_common::ApiResponse;
use slotline_teams::RemovedMembership;

use crate::error::ConsoleError;

/// Body of the remove-member RPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMembersRequest {
    pub team_ids: Vec<i64>,
    pub member_ids: Vec<i64>,
    pub is_org: bool,
}

#[async_trait::async_trait]
pub trait RemoveMemberClient: Send + Sync {
    async fn remove_members(
        &self,
        request: RemoveMembersRequest,
    ) -> Result<Vec<RemovedMembership>, ConsoleError>;
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

pub struct HttpRemoveMemberClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpRemoveMemberClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/v1/teams/remove-member", base_url.trim_end_matches('/')),
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl RemoveMemberClient for HttpRemoveMemberClient {
    async fn remove_members(
        &self,
        request: RemoveMembersRequest,
    ) -> Result<Vec<RemovedMembership>, ConsoleError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ConsoleError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::Request(e.to_string()))?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorEnvelope>(&body)
                .map_err(|_| ConsoleError::Api {
                    status: status.as_u16(),
                    code: "UNKNOWN".to_string(),
                    message: format!("Remove member request failed with status {}", status),
                })?
                .error;
            return Err(ConsoleError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        let envelope: ApiResponse<Vec<RemovedMembership>> =
            serde_json::from_slice(&body).map_err(|e| ConsoleError::Decode(e.to_string()))?;

        let removed = envelope.data.unwrap_or_default();
        tracing::debug!(count = removed.len(), "Members removed");
        Ok(removed)
    }
}
