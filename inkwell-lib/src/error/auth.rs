//! Authentication error types

use super::{ApiError, StorageError};

/// Errors that can occur in the session and auth flows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable access token, or the server rejected it.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}
