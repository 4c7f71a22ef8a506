//! Pool reconciliation error types.

use thiserror::Error;

use director_agent::AgentError;
use director_cloud::CloudError;
use director_state::StateError;

use crate::workers::WorkerError;

/// Errors that can occur while provisioning or reconciling a pool.
///
/// Each collaborator's error is carried as-is, so a failure that triggered
/// compensation reaches the caller as the same variant it was raised as.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("cloud error: {0}")]
    Cloud(#[from] CloudError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("state store error: {0}")]
    State(#[from] StateError),

    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
}

pub type PoolResult<T> = Result<T, PoolError>;
