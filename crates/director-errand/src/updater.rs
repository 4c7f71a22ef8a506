//! Scoped instance provisioning around an errand run.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use director_core::InstanceGroup;

use crate::error::Result;
use crate::keep_alive::KeepAlive;
use crate::manager::InstanceGroupManager;

/// Ensures an errand's instances exist for the duration of a run.
pub struct ErrandInstanceUpdater {
    manager: Arc<dyn InstanceGroupManager>,
    errand_name: String,
    deployment_name: String,
}

impl ErrandInstanceUpdater {
    pub fn new(
        manager: Arc<dyn InstanceGroupManager>,
        errand_name: &str,
        deployment_name: &str,
    ) -> Self {
        Self {
            manager,
            errand_name: errand_name.to_string(),
            deployment_name: deployment_name.to_string(),
        }
    }

    /// Provision the instance group, run `inner`, then keep or delete the
    /// VMs according to `keep_alive`.
    ///
    /// The keep/delete decision runs exactly once, after `inner` finishes or
    /// after provisioning fails. An error from provisioning or from `inner`
    /// is returned even when teardown fails as well; a teardown failure is
    /// only returned when everything before it succeeded.
    pub async fn with_updated_instances<F, Fut, T>(
        &self,
        instance_group: &InstanceGroup,
        keep_alive: KeepAlive,
        changes_exist: bool,
        inner: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = async {
            self.update_instances(instance_group, changes_exist).await?;
            inner().await
        }
        .await;

        let teardown = self
            .release_instances(instance_group, keep_alive, changes_exist)
            .await;

        match (outcome, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(teardown_err)) => {
                error!(
                    errand = %self.errand_name,
                    deployment = %self.deployment_name,
                    error = %teardown_err,
                    "failed to delete errand vms after errand failure"
                );
                Err(e)
            }
        }
    }

    async fn update_instances(&self, instance_group: &InstanceGroup, changes_exist: bool) -> Result<()> {
        info!(
            errand = %self.errand_name,
            deployment = %self.deployment_name,
            instance_group = %instance_group.name,
            "creating missing errand vms"
        );
        self.manager.create_missing_vms().await?;

        if changes_exist {
            debug!(instance_group = %instance_group.name, "instance group changed, updating instances");
            self.manager.update_instances().await?;
        }
        Ok(())
    }

    async fn release_instances(
        &self,
        instance_group: &InstanceGroup,
        keep_alive: KeepAlive,
        changes_exist: bool,
    ) -> Result<()> {
        if keep_alive.keeps(changes_exist) {
            info!(
                errand = %self.errand_name,
                instance_group = %instance_group.name,
                %keep_alive,
                "skipping vm deletion, keep-alive is set"
            );
            return Ok(());
        }

        info!(
            errand = %self.errand_name,
            instance_group = %instance_group.name,
            "deleting errand vms"
        );
        self.manager.delete_vms().await
    }
}
