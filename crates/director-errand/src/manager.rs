//! Collaborators of an errand run.
//!
//! The instance group manager, runner and job renderer are owned by the
//! surrounding deployment machinery; errands only drive them through these
//! traits.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use director_core::{Instance, InstanceGroup};

use crate::error::Result;
use crate::result::ErrandResult;

/// Provisions and tears down the VMs of one instance group.
#[async_trait]
pub trait InstanceGroupManager: Send + Sync {
    /// Create VMs for instances that have none.
    async fn create_missing_vms(&self) -> Result<()>;

    /// Bring existing instances up to the current instance group spec.
    async fn update_instances(&self) -> Result<()>;

    async fn delete_vms(&self) -> Result<()>;
}

/// Builds an [`InstanceGroupManager`] for an instance group of a plan.
pub trait InstanceGroupManagerFactory: Send + Sync {
    fn manager_for(
        &self,
        planner: &dyn DeploymentPlanner,
        instance_group: &InstanceGroup,
    ) -> Arc<dyn InstanceGroupManager>;
}

/// Executes an errand on an instance.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run the errand to completion. Implementations watch `cancel` and
    /// stop the errand when it turns `true`.
    async fn run(&self, instance: &Instance, cancel: watch::Receiver<bool>) -> Result<ErrandResult>;
}

/// Cache of rendered job templates.
pub trait JobRenderer: Send + Sync {
    fn clean_cache(&self);
}

/// The deployment plan an errand runs against.
pub trait DeploymentPlanner: Send + Sync {
    fn name(&self) -> &str;

    fn job_renderer(&self) -> Arc<dyn JobRenderer>;
}
