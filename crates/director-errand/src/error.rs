//! Errand error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErrandError {
    #[error("instance group '{0}' is not a lifecycle errand")]
    NotLifecycleErrand(String),

    #[error("invalid agent task result: {0}")]
    InvalidTaskResult(String),

    #[error("unknown keep-alive policy '{0}', expected always, never or if-unchanged")]
    InvalidKeepAlive(String),

    #[error("instance group '{group}': {message}")]
    InstanceGroup { group: String, message: String },

    #[error("errand '{errand}' failed to run: {message}")]
    Runner { errand: String, message: String },

    #[error("errand '{0}' was cancelled")]
    Cancelled(String),
}

pub type Result<T, E = ErrandError> = std::result::Result<T, E>;
