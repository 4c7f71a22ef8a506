//! Agent handle and factory traits.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use director_core::{ApplySpec, Properties};

use crate::error::AgentResult;

/// Settings pushed to a freshly booted agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSettings {
    /// PEM bundle the agent installs into its trust store.
    pub trusted_certs: String,
}

/// RPC handle bound to one agent.
///
/// Implementations are stateless dispatchers and may be shared across
/// concurrent provisioning tasks.
#[async_trait]
pub trait AgentHandle: Send + Sync {
    fn agent_id(&self) -> &str;

    /// Suspend until the agent reports liveness or the handle's timeout
    /// elapses.
    async fn wait_until_ready(&self) -> AgentResult<()>;

    async fn update_settings(&self, settings: &AgentSettings) -> AgentResult<()>;

    async fn get_state(&self) -> AgentResult<Properties>;

    async fn apply(&self, spec: &ApplySpec) -> AgentResult<()>;
}

/// Produces handles for agents by id.
pub trait AgentFactory: Send + Sync {
    fn for_agent(&self, agent_id: &str) -> Arc<dyn AgentHandle>;
}
