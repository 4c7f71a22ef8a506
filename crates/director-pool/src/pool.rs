//! Resource pools and their placeholders.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;

use director_core::{Instance, Properties};
use director_state::{DeploymentRecord, StemcellRecord, VmRecord};

/// Immutable configuration of a resource pool for one reconciliation pass.
#[derive(Clone)]
pub struct PoolSpec {
    pub name: String,
    /// Owning deployment.
    pub deployment: DeploymentRecord,
    pub stemcell: StemcellRecord,
    /// Passed through to the cloud driver.
    pub cloud_properties: Properties,
    /// Passed through to the cloud driver. May carry secrets; never logged.
    pub env: Properties,
    /// Network settings for placeholders with no bound instance.
    pub network_settings: Properties,
}

impl PoolSpec {
    /// The pool's own spec snapshot, as sent to agents in the apply spec.
    pub fn spec(&self) -> Properties {
        let mut spec = Properties::new();
        spec.insert("name".to_string(), json!(self.name));
        spec.insert(
            "cloud_properties".to_string(),
            serde_json::Value::Object(self.cloud_properties.clone()),
        );
        spec.insert(
            "stemcell".to_string(),
            json!({
                "name": self.stemcell.name,
                "version": self.stemcell.version,
            }),
        );
        spec
    }
}

impl fmt::Debug for PoolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolSpec")
            .field("name", &self.name)
            .field("deployment", &self.deployment.name)
            .field("stemcell", &self.stemcell)
            .field("cloud_properties", &self.cloud_properties)
            .field("env", &"<redacted>")
            .field("network_settings", &self.network_settings)
            .finish()
    }
}

// ── Placeholder ───────────────────────────────────────────────────

/// One unit of pool capacity.
///
/// Created by the planner. Provisioning only ever fills in the backing VM
/// record; each placeholder is targeted by at most one provisioning job per
/// pass.
#[derive(Debug, Default)]
pub struct VmPlaceholder {
    bound_instance: Option<Arc<Instance>>,
    model: RwLock<Option<VmRecord>>,
}

impl VmPlaceholder {
    /// Spare capacity with no instance assigned.
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn bound_to(instance: Arc<Instance>) -> Self {
        Self {
            bound_instance: Some(instance),
            model: RwLock::new(None),
        }
    }

    /// Mark the placeholder as already backed by a VM.
    pub fn with_model(self, record: VmRecord) -> Self {
        Self {
            model: RwLock::new(Some(record)),
            ..self
        }
    }

    pub fn bound_instance(&self) -> Option<&Arc<Instance>> {
        self.bound_instance.as_ref()
    }

    pub async fn model(&self) -> Option<VmRecord> {
        self.model.read().await.clone()
    }

    pub async fn has_model(&self) -> bool {
        self.model.read().await.is_some()
    }

    pub(crate) async fn set_model(&self, record: VmRecord) {
        *self.model.write().await = Some(record);
    }

    /// Bound instance's network settings, or the pool defaults when unbound.
    pub fn network_settings<'a>(&'a self, pool: &'a PoolSpec) -> &'a Properties {
        match &self.bound_instance {
            Some(instance) => &instance.network_settings,
            None => &pool.network_settings,
        }
    }
}

// ── Pool ──────────────────────────────────────────────────────────

/// A named, sized group of VMs sharing stemcell, network and cloud config.
#[derive(Debug)]
pub struct ResourcePool {
    spec: Arc<PoolSpec>,
    placeholders: Vec<Arc<VmPlaceholder>>,
}

impl ResourcePool {
    pub fn new(spec: PoolSpec) -> Self {
        Self {
            spec: Arc::new(spec),
            placeholders: Vec::new(),
        }
    }

    pub fn with_placeholders(
        spec: PoolSpec,
        placeholders: impl IntoIterator<Item = VmPlaceholder>,
    ) -> Self {
        Self {
            spec: Arc::new(spec),
            placeholders: placeholders.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn add_placeholder(&mut self, placeholder: VmPlaceholder) -> Arc<VmPlaceholder> {
        let placeholder = Arc::new(placeholder);
        self.placeholders.push(placeholder.clone());
        placeholder
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &Arc<PoolSpec> {
        &self.spec
    }

    pub fn placeholders(&self) -> &[Arc<VmPlaceholder>] {
        &self.placeholders
    }

    pub fn size(&self) -> usize {
        self.placeholders.len()
    }

    /// Number of placeholders without a backing VM.
    pub async fn missing_vm_count(&self) -> usize {
        let mut count = 0;
        for placeholder in &self.placeholders {
            if !placeholder.has_model().await {
                count += 1;
            }
        }
        count
    }

    /// Number of bound placeholders without a backing VM.
    pub async fn bound_missing_vm_count(&self) -> usize {
        let mut count = 0;
        for placeholder in &self.placeholders {
            if placeholder.bound_instance().is_some() && !placeholder.has_model().await {
                count += 1;
            }
        }
        count
    }
}
