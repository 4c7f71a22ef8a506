//! VM creation: agent id assignment plus the cloud call.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};
use uuid::Uuid;

use director_cloud::{CloudDriver, CloudResult};
use director_core::Properties;
use director_state::{DeploymentRecord, StemcellRecord, VmRecord};

/// Creates VMs in the cloud and builds their (not yet persisted) records.
#[derive(Clone)]
pub struct VmCreator {
    cloud: Arc<dyn CloudDriver>,
}

impl VmCreator {
    pub fn new(cloud: Arc<dyn CloudDriver>) -> Self {
        Self { cloud }
    }

    /// Create a VM and return its record.
    ///
    /// A fresh agent id is generated unless `existing_agent_id` is given.
    /// The returned record is not written to the state store; that happens
    /// once the agent has accepted its first apply spec.
    pub async fn create(
        &self,
        deployment: &DeploymentRecord,
        stemcell: &StemcellRecord,
        cloud_properties: &Properties,
        network_settings: &Properties,
        existing_agent_id: Option<&str>,
        env: &Properties,
    ) -> CloudResult<VmRecord> {
        let agent_id = match existing_agent_id {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        debug!(
            deployment = %deployment.name,
            stemcell = %stemcell.cid,
            %agent_id,
            "creating vm"
        );
        let cid = self
            .cloud
            .create_vm(&agent_id, &stemcell.cid, cloud_properties, network_settings, env)
            .await?;
        info!(%cid, %agent_id, deployment = %deployment.name, "vm created");

        Ok(VmRecord {
            cid,
            agent_id,
            deployment: deployment.name.clone(),
            trusted_certs_sha1: None,
            apply_spec: None,
            created_at: epoch_secs(),
        })
    }
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
