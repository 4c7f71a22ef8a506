//! Agent state synchronization: building, sending and recording apply specs.

use tracing::debug;

use director_agent::{AgentFactory, AgentHandle};
use director_core::ApplySpec;
use director_state::{StateError, StateStore, VmRecord};

use crate::error::PoolResult;
use crate::pool::{PoolSpec, VmPlaceholder};

/// Pushes the canonical apply spec to an agent and records it on the VM.
#[derive(Clone)]
pub struct AgentStateSynchronizer {
    state: StateStore,
}

impl AgentStateSynchronizer {
    pub fn new(state: StateStore) -> Self {
        Self { state }
    }

    /// `{deployment, resource_pool, networks}` for a placeholder.
    pub fn apply_spec(pool: &PoolSpec, placeholder: &VmPlaceholder) -> ApplySpec {
        ApplySpec {
            deployment: pool.deployment.name.clone(),
            resource_pool: pool.spec(),
            networks: placeholder.network_settings(pool).clone(),
        }
    }

    /// Send the apply spec, then write the full record.
    ///
    /// This is the write that creates the record of a freshly provisioned
    /// VM, so every field of `record` is stored as-is and any record left
    /// under the same cid is replaced. The record reflects the last spec
    /// sent; no confirmation round-trip is made. A send failure leaves both
    /// the record and the store untouched.
    pub async fn update_state(
        &self,
        agent: &dyn AgentHandle,
        record: &mut VmRecord,
        pool: &PoolSpec,
        placeholder: &VmPlaceholder,
    ) -> PoolResult<()> {
        self.send(agent, record, pool, placeholder).await?;
        self.state.put_vm(record)?;
        Ok(())
    }

    /// Re-send the apply spec for a placeholder that already has a VM.
    ///
    /// Only `apply_spec` is written to the stored record; its other fields
    /// are kept. Returns `false` when the placeholder has no VM yet.
    pub async fn refresh(
        &self,
        agents: &dyn AgentFactory,
        pool: &PoolSpec,
        placeholder: &VmPlaceholder,
    ) -> PoolResult<bool> {
        let Some(mut record) = placeholder.model().await else {
            return Ok(false);
        };
        let agent = agents.for_agent(&record.agent_id);
        self.send(agent.as_ref(), &mut record, pool, placeholder)
            .await?;
        self.persist_apply_spec(&record)?;
        placeholder.set_model(record).await;
        Ok(true)
    }

    async fn send(
        &self,
        agent: &dyn AgentHandle,
        record: &mut VmRecord,
        pool: &PoolSpec,
        placeholder: &VmPlaceholder,
    ) -> PoolResult<()> {
        let spec = Self::apply_spec(pool, placeholder);
        agent.apply(&spec).await?;
        debug!(cid = %record.cid, agent_id = %agent.agent_id(), "apply spec sent");
        record.apply_spec = Some(spec);
        Ok(())
    }

    /// Set `apply_spec` on the stored record, writing the whole record if
    /// the store has lost it.
    fn persist_apply_spec(&self, record: &VmRecord) -> PoolResult<()> {
        let spec = record.apply_spec.clone();
        match self.state.update_vm(&record.cid, move |stored| stored.apply_spec = spec) {
            Ok(_) => Ok(()),
            Err(StateError::VmNotFound(_)) => {
                self.state.put_vm(record)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
