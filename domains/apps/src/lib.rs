//! Apps domain: credentials created when an app-store app is installed

pub mod api;
pub mod domain;
pub mod installation;
pub mod repository;

pub use domain::entities::*;
pub use installation::{assert_installed, create_default_installation, is_app_installed};
pub use repository::{CredentialStore, InMemoryCredentialStore, PgCredentialStore};

pub use api::routes;
pub use api::AppsState;
