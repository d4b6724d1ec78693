//! Application error types.

use thiserror::Error;

use crate::permissions::Role;

/// Application errors.
///
/// Menu operations never produce errors: malformed menu input degrades to
/// safe defaults (orphan-as-root, `"#"` href) so a broken record can never
/// take down the page chrome.
#[derive(Debug, Error)]
pub enum Error {
    #[error("internal error")]
    Internal(#[from] anyhow::Error),

    #[error("visit log queue is full")]
    VisitQueueFull,

    #[error("visit log worker has shut down")]
    VisitLogClosed,

    #[error("requires {required} role or higher (user has {actual})")]
    InsufficientRole { required: Role, actual: Role },

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
