//! Delete-member modal state
//!
//! The modal is either closed or open for exactly one member. Transitions go
//! through `ModalState::reduce` so the view never holds a half-open modal.

/// Member the modal was opened for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMember {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open { member: SelectedMember },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    OpenFor(SelectedMember),
    Close,
}

impl ModalState {
    pub fn reduce(self, action: ModalAction) -> ModalState {
        match action {
            ModalAction::OpenFor(member) => ModalState::Open { member },
            ModalAction::Close => ModalState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }

    pub fn member(&self) -> Option<&SelectedMember> {
        match self {
            ModalState::Open { member } => Some(member),
            ModalState::Closed => None,
        }
    }
}
