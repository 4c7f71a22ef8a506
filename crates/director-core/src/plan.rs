//! Deployment plan types shared by the pool reconciler and the errand
//! lifecycle.
//!
//! These are in-memory planner entities. The planner builds them before a
//! reconciliation pass; provisioning only mutates an instance's `current_state`.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Opaque key-value map: cloud properties, env, network settings, agent state.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Canonical state descriptor pushed to an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplySpec {
    /// Name of the deployment plan.
    pub deployment: String,
    /// The resource pool's own spec snapshot.
    pub resource_pool: Properties,
    /// Network settings of the instance occupying the VM.
    pub networks: Properties,
}

// ── Instance ──────────────────────────────────────────────────────

/// A deployment instance, possibly bound to a pool placeholder.
#[derive(Debug)]
pub struct Instance {
    pub job: String,
    pub index: u32,
    /// Network name → settings.
    pub network_settings: Properties,
    current_state: RwLock<Option<Properties>>,
}

impl Instance {
    pub fn new(job: &str, index: u32, network_settings: Properties) -> Self {
        Self {
            job: job.to_string(),
            index,
            network_settings,
            current_state: RwLock::new(None),
        }
    }

    /// `{job}/{index}`, as used in logs.
    pub fn name(&self) -> String {
        format!("{}/{}", self.job, self.index)
    }

    /// Last state reported by the agent, if any was recorded.
    pub async fn current_state(&self) -> Option<Properties> {
        self.current_state.read().await.clone()
    }

    pub async fn set_current_state(&self, state: Properties) {
        *self.current_state.write().await = Some(state);
    }
}

// ── Instance group ────────────────────────────────────────────────

/// Whether an instance group runs long-lived services or one-shot errands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Service,
    Errand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceGroup {
    pub name: String,
    pub lifecycle: Lifecycle,
    pub instances: u32,
}

impl InstanceGroup {
    pub fn is_errand(&self) -> bool {
        self.lifecycle == Lifecycle::Errand
    }
}
