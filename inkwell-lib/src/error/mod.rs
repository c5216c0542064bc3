//! Error types

mod api;
mod auth;
mod storage;

pub use api::*;
pub use auth::*;
pub use storage::*;

/// Top-level error for callers that do not care which layer failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
