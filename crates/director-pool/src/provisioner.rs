//! Single-VM provisioning with compensation.
//!
//! A provisioning job creates a VM in the cloud and then brings its agent
//! up to date. If any step after creation fails, the VM is deleted again
//! before the error is returned, so a failed job never leaves an orphan in
//! the cloud or a record in the state store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use director_agent::{AgentFactory, AgentHandle, AgentSettings};
use director_cloud::{CloudDriver, CloudError};
use director_core::{Properties, TrustedCerts};
use director_state::{StateStore, VmRecord};

use crate::error::{PoolError, PoolResult};
use crate::pool::{PoolSpec, VmPlaceholder};
use crate::synchronizer::AgentStateSynchronizer;
use crate::vm_creator::VmCreator;

/// Provisions a single placeholder. Implemented by [`VmProvisioner`].
#[async_trait]
pub trait Provision: Send + Sync {
    async fn provision(&self, pool: &PoolSpec, placeholder: &VmPlaceholder) -> PoolResult<()>;
}

/// Creates, bootstraps and records one VM per call.
pub struct VmProvisioner {
    creator: VmCreator,
    cloud: Arc<dyn CloudDriver>,
    agents: Arc<dyn AgentFactory>,
    synchronizer: AgentStateSynchronizer,
    trusted_certs: TrustedCerts,
}

impl VmProvisioner {
    pub fn new(
        cloud: Arc<dyn CloudDriver>,
        agents: Arc<dyn AgentFactory>,
        state: StateStore,
        trusted_certs: TrustedCerts,
    ) -> Self {
        Self {
            creator: VmCreator::new(cloud.clone()),
            cloud,
            agents,
            synchronizer: AgentStateSynchronizer::new(state),
            trusted_certs,
        }
    }

    /// Steps that run against a VM that already exists in the cloud.
    /// Returns the agent's reported state.
    async fn bootstrap(
        &self,
        agent: &dyn AgentHandle,
        record: &mut VmRecord,
        pool: &PoolSpec,
        placeholder: &VmPlaceholder,
    ) -> PoolResult<Properties> {
        agent.wait_until_ready().await?;

        let settings = AgentSettings {
            trusted_certs: self.trusted_certs.pem().to_string(),
        };
        agent.update_settings(&settings).await?;
        record.trusted_certs_sha1 = Some(self.trusted_certs.sha1());

        let state = agent.get_state().await?;
        self.synchronizer
            .update_state(agent, record, pool, placeholder)
            .await?;
        Ok(state)
    }

    /// Best-effort delete of a VM whose provisioning failed.
    async fn discard_vm(&self, cid: &str, cause: &PoolError) {
        warn!(%cid, error = %cause, "provisioning failed, deleting vm");
        match self.cloud.delete_vm(cid).await {
            Ok(()) | Err(CloudError::VmNotFound(_)) => info!(%cid, "vm deleted"),
            Err(e) => error!(%cid, error = %e, "failed to delete vm after provisioning failure"),
        }
    }
}

#[async_trait]
impl Provision for VmProvisioner {
    async fn provision(&self, pool: &PoolSpec, placeholder: &VmPlaceholder) -> PoolResult<()> {
        let mut record = self
            .creator
            .create(
                &pool.deployment,
                &pool.stemcell,
                &pool.cloud_properties,
                placeholder.network_settings(pool),
                None,
                &pool.env,
            )
            .await?;

        let agent = self.agents.for_agent(&record.agent_id);
        let state = match self
            .bootstrap(agent.as_ref(), &mut record, pool, placeholder)
            .await
        {
            Ok(state) => state,
            Err(e) => {
                self.discard_vm(&record.cid, &e).await;
                return Err(e);
            }
        };

        let cid = record.cid.clone();
        placeholder.set_model(record).await;
        if let Some(instance) = placeholder.bound_instance() {
            instance.set_current_state(state).await;
            info!(%cid, instance = %instance.name(), pool = %pool.name, "vm provisioned");
        } else {
            info!(%cid, pool = %pool.name, "vm provisioned");
        }
        Ok(())
    }
}
