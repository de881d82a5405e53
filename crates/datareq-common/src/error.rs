//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, DataReqError>;

/// Errors raised by the shared domain types
#[derive(Error, Debug)]
pub enum DataReqError {
    #[error("Invalid vote value {0}: expected 1 or -1")]
    InvalidVote(i64),

    #[error("Data request {0} is already closed")]
    AlreadyClosed(uuid::Uuid),
}
