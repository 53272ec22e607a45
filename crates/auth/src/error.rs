//! Error types for session persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
