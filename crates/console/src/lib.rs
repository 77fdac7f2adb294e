//! Slotline console: member removal from the organization member list
//!
//! Provides:
//! - The delete-member modal state machine
//! - A member-list cache with snapshot/restore for optimistic updates
//! - A `RemoveMemberClient` trait with HTTP and mock implementations
//! - The controller tying them together on confirm

pub mod cache;
pub mod client;
pub mod controller;
pub mod error;
pub mod mock;
pub mod modal;

pub use cache::{CachedView, InfiniteData, MemberListCache, MemberListKey};
pub use client::{HttpRemoveMemberClient, RemoveMemberClient, RemoveMembersRequest};
pub use controller::{ConfirmOutcome, DeleteMemberController, Session, Toast, ToastKind};
pub use error::ConsoleError;
pub use mock::MockRemoveMemberClient;
pub use modal::{ModalAction, ModalState, SelectedMember};
