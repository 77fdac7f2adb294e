//! Teams domain: teams, memberships, and member removal

pub mod api;
pub mod domain;
pub mod removal;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use removal::{remove_member, RemoveMemberInput};
pub use repository::{
    InMemoryTeamsStore, MemberRemovalUnit, PgTeamsStore, RemovalStep, TeamsStore,
};

// Re-export API types
pub use api::routes;
pub use api::TeamsState;
