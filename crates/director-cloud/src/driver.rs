//! Cloud driver trait.

use async_trait::async_trait;

use director_core::Properties;

use crate::error::CloudResult;

/// Infrastructure API: create and delete VMs.
///
/// Drivers are stateless dispatchers and are shared across concurrent
/// provisioning tasks.
#[async_trait]
pub trait CloudDriver: Send + Sync {
    /// Boot a VM from a stemcell image and return its cloud id.
    ///
    /// `agent_id` is baked into the VM so its agent can identify itself.
    async fn create_vm(
        &self,
        agent_id: &str,
        stemcell_cid: &str,
        cloud_properties: &Properties,
        networks: &Properties,
        env: &Properties,
    ) -> CloudResult<String>;

    /// Delete a VM. Deleting a VM that is already gone yields
    /// `CloudError::VmNotFound`, which callers may treat as success.
    async fn delete_vm(&self, cid: &str) -> CloudResult<()>;
}
