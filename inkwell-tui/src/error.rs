//! Application error type

use inkwell_lib::error::{ApiError, AuthError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Lib(#[from] inkwell_lib::Error),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// The login prompt was abandoned or ran out of attempts.
    #[error("Not signed in")]
    NotSignedIn,
}
