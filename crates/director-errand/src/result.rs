//! Errand exit status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrandError, Result};

/// Exit codes above this mean the errand process was killed by a signal.
const SIGNAL_EXIT_BASE: i64 = 128;

/// Outcome of one errand run as reported by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrandResult {
    pub exit_code: i64,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    /// Blobstore id of the fetched errand logs, if any were fetched.
    pub logs_blobstore_id: Option<String>,
}

impl ErrandResult {
    pub fn new(exit_code: i64) -> Self {
        Self {
            exit_code,
            stdout: None,
            stderr: None,
            logs_blobstore_id: None,
        }
    }

    /// Build a result from the agent's `{exit_code, stdout, stderr}` task
    /// result.
    pub fn from_agent_task_result(
        task_result: &Value,
        logs_blobstore_id: Option<String>,
    ) -> Result<Self> {
        let exit_code = task_result
            .get("exit_code")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                ErrandError::InvalidTaskResult(format!("missing exit_code in {task_result}"))
            })?;
        let text = |key: &str| task_result.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            exit_code,
            stdout: text("stdout"),
            stderr: text("stderr"),
            logs_blobstore_id,
        })
    }

    pub fn successful(&self) -> bool {
        self.exit_code == 0
    }

    pub fn cancelled(&self) -> bool {
        self.exit_code > SIGNAL_EXIT_BASE
    }

    /// One-line summary naming the errand and its exit code.
    pub fn short_description(&self, errand_name: &str) -> String {
        let outcome = if self.successful() {
            "completed successfully"
        } else if self.cancelled() {
            "was canceled"
        } else {
            "completed with error"
        };
        format!(
            "Errand '{errand_name}' {outcome} (exit code {})",
            self.exit_code
        )
    }
}
