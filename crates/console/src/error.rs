//! Console errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    #[error("Request failed: {0}")]
    Request(String),

    /// Error envelope returned by the API; `message` is shown to the user
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),
}
