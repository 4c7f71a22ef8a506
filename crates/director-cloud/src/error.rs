//! Cloud driver error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("vm creation failed: {0}")]
    CreateFailed(String),

    #[error("vm {0} not found")]
    VmNotFound(String),

    #[error("vm {cid} deletion failed: {message}")]
    DeleteFailed { cid: String, message: String },
}

pub type CloudResult<T> = Result<T, CloudError>;
