//! Errors raised by the director state store.

use thiserror::Error;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open state store: {0}")]
    Open(String),

    /// A redb transaction, table or row access failed. `op` names the step.
    #[error("state store {op} failed: {message}")]
    Storage { op: &'static str, message: String },

    /// A stored value could not be encoded or decoded as JSON.
    #[error("bad record in {table}: {message}")]
    Record { table: String, message: String },

    /// `update_vm` was asked to modify a cid with no stored record.
    #[error("no vm record for cid {0}")]
    VmNotFound(String),
}
