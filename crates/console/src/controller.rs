//! Delete-member controller
//!
//! Owns the modal, the member-list cache and the toast queue for the
//! organization member list. `confirm` removes the selected member
//! optimistically and rolls the list back if the server rejects it.

use crate::cache::{CachedView, MemberListCache, MemberListKey};
use crate::client::{RemoveMemberClient, RemoveMembersRequest};
use crate::modal::{ModalAction, ModalState};

/// Page size of the member list the console renders
const MEMBER_LIST_PAGE_SIZE: i64 = 10;

/// Signed-in session as seen by the console
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub org_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// What `confirm` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// No organization or no selected member
    Skipped,
    Removed,
    Failed,
}

pub struct DeleteMemberController<C> {
    client: C,
    cache: MemberListCache,
    modal: ModalState,
    toasts: Vec<Toast>,
}

impl<C: RemoveMemberClient> DeleteMemberController<C> {
    pub fn new(client: C, cache: MemberListCache) -> Self {
        Self {
            client,
            cache,
            modal: ModalState::default(),
            toasts: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: ModalAction) {
        self.modal = std::mem::take(&mut self.modal).reduce(action);
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn cache(&self) -> &MemberListCache {
        &self.cache
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Drain pending toasts
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Remove the selected member from the session's organization
    pub async fn confirm(&mut self, session: Session) -> ConfirmOutcome {
        let Some(org_id) = session.org_id else {
            return ConfirmOutcome::Skipped;
        };
        let Some(member_id) = self.modal.member().map(|member| member.id) else {
            return ConfirmOutcome::Skipped;
        };

        let key = MemberListKey::new(MEMBER_LIST_PAGE_SIZE, "");
        let snapshot = self.cache.snapshot(&key);
        self.cache
            .set_infinite_data(&key, |current| current.map(|data| data.without_member(member_id)));

        let request = RemoveMembersRequest {
            team_ids: vec![org_id],
            member_ids: vec![member_id],
            is_org: true,
        };

        match self.client.remove_members(request).await {
            Ok(_) => {
                self.cache.invalidate(CachedView::TeamsGet);
                self.cache.invalidate(CachedView::EventTypes);
                self.toasts.push(Toast {
                    kind: ToastKind::Success,
                    message: "success".to_string(),
                });
                self.dispatch(ModalAction::Close);
                ConfirmOutcome::Removed
            }
            Err(err) => {
                tracing::warn!(org_id, member_id, error = %err, "Member removal rejected");
                self.cache.restore(&key, snapshot);
                self.toasts.push(Toast {
                    kind: ToastKind::Error,
                    message: err.to_string(),
                });
                ConfirmOutcome::Failed
            }
        }
    }
}
