//! Agent error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by agent RPCs.
///
/// A readiness timeout is not special-cased by callers: every variant is
/// fatal to the current provisioning attempt.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("timed out after {timeout:?} waiting for agent {agent_id} ({method})")]
    Timeout {
        agent_id: String,
        method: String,
        timeout: Duration,
    },

    #[error("agent {agent_id} rejected {method}: {message}")]
    Rpc {
        agent_id: String,
        method: String,
        message: String,
    },

    #[error("agent {0} unreachable")]
    Unreachable(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
