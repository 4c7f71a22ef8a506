//! Recording fakes for the errand collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use director_core::{Instance, InstanceGroup, Lifecycle};

use crate::error::{ErrandError, Result};
use crate::manager::{
    DeploymentPlanner, InstanceGroupManager, InstanceGroupManagerFactory, JobRenderer, Runner,
};
use crate::result::ErrandResult;

pub(crate) fn errand_group() -> InstanceGroup {
    InstanceGroup {
        name: "smoke-tests".to_string(),
        lifecycle: Lifecycle::Errand,
        instances: 1,
    }
}

/// Shared, ordered log of collaborator calls.
#[derive(Clone, Default)]
pub(crate) struct Events(Arc<Mutex<Vec<&'static str>>>);

impl Events {
    pub fn push(&self, event: &'static str) {
        self.0.lock().unwrap().push(event);
    }

    pub fn all(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| **e == event).count()
    }
}

// ── Instance group manager ────────────────────────────────────────

pub(crate) struct FakeManager {
    events: Events,
    fail_create: bool,
    fail_delete: bool,
}

impl FakeManager {
    pub fn new(events: Events) -> Arc<Self> {
        Arc::new(Self {
            events,
            fail_create: false,
            fail_delete: false,
        })
    }

    pub fn failing_create(events: Events) -> Arc<Self> {
        Arc::new(Self {
            events,
            fail_create: true,
            fail_delete: false,
        })
    }

    pub fn failing_delete(events: Events) -> Arc<Self> {
        Arc::new(Self {
            events,
            fail_create: false,
            fail_delete: true,
        })
    }

    fn failure(message: &str) -> ErrandError {
        ErrandError::InstanceGroup {
            group: "smoke-tests".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl InstanceGroupManager for FakeManager {
    async fn create_missing_vms(&self) -> Result<()> {
        self.events.push("create_missing_vms");
        if self.fail_create {
            return Err(Self::failure("vm creation failed"));
        }
        Ok(())
    }

    async fn update_instances(&self) -> Result<()> {
        self.events.push("update_instances");
        Ok(())
    }

    async fn delete_vms(&self) -> Result<()> {
        self.events.push("delete_vms");
        if self.fail_delete {
            return Err(Self::failure("cloud unavailable"));
        }
        Ok(())
    }
}

pub(crate) struct FakeManagerFactory {
    manager: Arc<FakeManager>,
    requested: Mutex<Vec<(String, String)>>,
}

impl FakeManagerFactory {
    pub fn new(manager: Arc<FakeManager>) -> Self {
        Self {
            manager,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// `(deployment, instance group)` pairs managers were built for.
    pub fn requested(&self) -> Vec<(String, String)> {
        self.requested.lock().unwrap().clone()
    }
}

impl InstanceGroupManagerFactory for FakeManagerFactory {
    fn manager_for(
        &self,
        planner: &dyn DeploymentPlanner,
        instance_group: &InstanceGroup,
    ) -> Arc<dyn InstanceGroupManager> {
        self.requested
            .lock()
            .unwrap()
            .push((planner.name().to_string(), instance_group.name.clone()));
        self.manager.clone()
    }
}

// ── Planner and renderer ──────────────────────────────────────────

#[derive(Default)]
pub(crate) struct FakeRenderer {
    cleaned: AtomicUsize,
}

impl FakeRenderer {
    pub fn cleaned(&self) -> usize {
        self.cleaned.load(Ordering::SeqCst)
    }
}

impl JobRenderer for FakeRenderer {
    fn clean_cache(&self) {
        self.cleaned.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) struct FakePlanner {
    pub renderer: Arc<FakeRenderer>,
}

impl FakePlanner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            renderer: Arc::new(FakeRenderer::default()),
        })
    }
}

impl DeploymentPlanner for FakePlanner {
    fn name(&self) -> &str {
        "deployment-name"
    }

    fn job_renderer(&self) -> Arc<dyn JobRenderer> {
        self.renderer.clone()
    }
}

// ── Runner ────────────────────────────────────────────────────────

pub(crate) struct FakeRunner {
    events: Events,
    exit_code: Option<i64>,
    ran_on: Mutex<Vec<String>>,
}

impl FakeRunner {
    /// Runner whose errand exits with `exit_code`.
    pub fn exiting(events: Events, exit_code: i64) -> Arc<Self> {
        Arc::new(Self {
            events,
            exit_code: Some(exit_code),
            ran_on: Mutex::new(Vec::new()),
        })
    }

    /// Runner that fails before the errand produces a result.
    pub fn broken(events: Events) -> Arc<Self> {
        Arc::new(Self {
            events,
            exit_code: None,
            ran_on: Mutex::new(Vec::new()),
        })
    }

    pub fn ran_on(&self) -> Vec<String> {
        self.ran_on.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runner for FakeRunner {
    async fn run(&self, instance: &Instance, cancel: watch::Receiver<bool>) -> Result<ErrandResult> {
        self.events.push("run");
        self.ran_on.lock().unwrap().push(instance.name());
        if *cancel.borrow() {
            return Err(ErrandError::Cancelled("errand_name".to_string()));
        }
        match self.exit_code {
            Some(code) => Ok(ErrandResult::new(code)),
            None => Err(ErrandError::Runner {
                errand: "errand_name".to_string(),
                message: "agent task failed".to_string(),
            }),
        }
    }
}
