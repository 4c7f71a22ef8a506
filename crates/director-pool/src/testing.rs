//! Fakes for unit tests: an in-memory cloud and a scriptable agent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use director_agent::{AgentError, AgentFactory, AgentHandle, AgentResult, AgentSettings};
use director_cloud::{CloudDriver, CloudError, CloudResult};
use director_core::{ApplySpec, Properties};
use director_state::{DeploymentRecord, StemcellRecord, VmRecord};

use crate::pool::PoolSpec;

pub(crate) fn props(value: serde_json::Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

pub(crate) fn test_pool_spec() -> PoolSpec {
    PoolSpec {
        name: "large".to_string(),
        deployment: DeploymentRecord {
            name: "foo".to_string(),
            manifest: None,
            created_at: 1000,
        },
        stemcell: StemcellRecord {
            name: "ubuntu-jammy".to_string(),
            version: "1.200".to_string(),
            cid: "ami-123".to_string(),
        },
        cloud_properties: props(serde_json::json!({"size": "medium"})),
        env: props(serde_json::json!({"password": "foo-password"})),
        network_settings: props(serde_json::json!({"default": {"ip": "10.0.0.9"}})),
    }
}

pub(crate) fn test_vm_record(cid: &str, agent_id: &str) -> VmRecord {
    VmRecord {
        cid: cid.to_string(),
        agent_id: agent_id.to_string(),
        deployment: "foo".to_string(),
        trusted_certs_sha1: None,
        apply_spec: None,
        created_at: 1000,
    }
}

// ── Cloud ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct CreatedVm {
    pub cid: String,
    pub agent_id: String,
    pub stemcell_cid: String,
    pub networks: Properties,
    pub env: Properties,
}

#[derive(Default)]
pub(crate) struct FakeCloud {
    fail_create: bool,
    fail_delete: bool,
    next_id: AtomicUsize,
    created: Mutex<Vec<CreatedVm>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Default::default()
        }
    }

    pub fn created(&self) -> Vec<CreatedVm> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudDriver for FakeCloud {
    async fn create_vm(
        &self,
        agent_id: &str,
        stemcell_cid: &str,
        _cloud_properties: &Properties,
        networks: &Properties,
        env: &Properties,
    ) -> CloudResult<String> {
        if self.fail_create {
            return Err(CloudError::CreateFailed("quota exceeded".to_string()));
        }
        let cid = format!("vm-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.created.lock().unwrap().push(CreatedVm {
            cid: cid.clone(),
            agent_id: agent_id.to_string(),
            stemcell_cid: stemcell_cid.to_string(),
            networks: networks.clone(),
            env: env.clone(),
        });
        Ok(cid)
    }

    async fn delete_vm(&self, cid: &str) -> CloudResult<()> {
        self.deleted.lock().unwrap().push(cid.to_string());
        if self.fail_delete {
            return Err(CloudError::DeleteFailed {
                cid: cid.to_string(),
                message: "api unavailable".to_string(),
            });
        }
        Ok(())
    }
}

// ── Agent ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgentStep {
    Ready,
    Settings,
    State,
    Apply,
}

pub(crate) struct FakeAgent {
    fail_on: Option<AgentStep>,
    state: Properties,
    calls: Mutex<Vec<AgentStep>>,
    settings: Mutex<Vec<AgentSettings>>,
    applied: Mutex<Vec<ApplySpec>>,
}

impl FakeAgent {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::with_failure(None))
    }

    pub fn failing_on(step: AgentStep) -> Arc<Self> {
        Arc::new(Self::with_failure(Some(step)))
    }

    fn with_failure(fail_on: Option<AgentStep>) -> Self {
        Self {
            fail_on,
            state: props(serde_json::json!({"state": "foo"})),
            calls: Mutex::new(Vec::new()),
            settings: Mutex::new(Vec::new()),
            applied: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<AgentStep> {
        self.calls.lock().unwrap().clone()
    }

    pub fn settings(&self) -> Vec<AgentSettings> {
        self.settings.lock().unwrap().clone()
    }

    pub fn applied(&self) -> Vec<ApplySpec> {
        self.applied.lock().unwrap().clone()
    }

    fn step(&self, agent_id: &str, step: AgentStep) -> AgentResult<()> {
        self.calls.lock().unwrap().push(step);
        match self.fail_on {
            Some(AgentStep::Ready) if step == AgentStep::Ready => Err(AgentError::Timeout {
                agent_id: agent_id.to_string(),
                method: "ping".to_string(),
                timeout: Duration::from_secs(600),
            }),
            Some(failing) if failing == step => Err(AgentError::Rpc {
                agent_id: agent_id.to_string(),
                method: format!("{step:?}"),
                message: "timeout".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

struct FakeAgentHandle {
    id: String,
    agent: Arc<FakeAgent>,
}

#[async_trait]
impl AgentHandle for FakeAgentHandle {
    fn agent_id(&self) -> &str {
        &self.id
    }

    async fn wait_until_ready(&self) -> AgentResult<()> {
        self.agent.step(&self.id, AgentStep::Ready)
    }

    async fn update_settings(&self, settings: &AgentSettings) -> AgentResult<()> {
        self.agent.step(&self.id, AgentStep::Settings)?;
        self.agent.settings.lock().unwrap().push(settings.clone());
        Ok(())
    }

    async fn get_state(&self) -> AgentResult<Properties> {
        self.agent.step(&self.id, AgentStep::State)?;
        Ok(self.agent.state.clone())
    }

    async fn apply(&self, spec: &ApplySpec) -> AgentResult<()> {
        self.agent.step(&self.id, AgentStep::Apply)?;
        self.agent.applied.lock().unwrap().push(spec.clone());
        Ok(())
    }
}

/// Hands out handles that all share one scripted agent.
pub(crate) struct FakeAgentFactory {
    agent: Arc<FakeAgent>,
    requested: Mutex<Vec<String>>,
}

impl FakeAgentFactory {
    pub fn new(agent: Arc<FakeAgent>) -> Self {
        Self {
            agent,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl AgentFactory for FakeAgentFactory {
    fn for_agent(&self, agent_id: &str) -> Arc<dyn AgentHandle> {
        self.requested.lock().unwrap().push(agent_id.to_string());
        Arc::new(FakeAgentHandle {
            id: agent_id.to_string(),
            agent: self.agent.clone(),
        })
    }
}
