//! Lifecycle errand step.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use director_core::{Instance, InstanceGroup};

use crate::error::{ErrandError, Result};
use crate::keep_alive::KeepAlive;
use crate::manager::{DeploymentPlanner, InstanceGroupManagerFactory, JobRenderer, Runner};
use crate::updater::ErrandInstanceUpdater;

/// What a single errand run targets and how its instances are treated.
#[derive(Debug, Clone)]
pub struct ErrandContext {
    pub errand_name: String,
    pub instance_group: InstanceGroup,
    /// The instance group spec changed since its instances were created.
    pub changes_exist: bool,
    pub keep_alive: KeepAlive,
    pub deployment_name: String,
}

/// Cleans the job render cache when dropped.
struct CacheCleaner(Arc<dyn JobRenderer>);

impl Drop for CacheCleaner {
    fn drop(&mut self) {
        debug!("cleaning job render cache");
        self.0.clean_cache();
    }
}

/// Runs one lifecycle errand on an instance that exists only as long as
/// its keep-alive policy asks.
pub struct LifecycleErrandStep {
    runner: Arc<dyn Runner>,
    planner: Arc<dyn DeploymentPlanner>,
    managers: Arc<dyn InstanceGroupManagerFactory>,
    instance: Arc<Instance>,
    context: ErrandContext,
}

impl LifecycleErrandStep {
    pub fn new(
        runner: Arc<dyn Runner>,
        planner: Arc<dyn DeploymentPlanner>,
        managers: Arc<dyn InstanceGroupManagerFactory>,
        instance: Arc<Instance>,
        context: ErrandContext,
    ) -> Self {
        Self {
            runner,
            planner,
            managers,
            instance,
            context,
        }
    }

    pub fn errand_name(&self) -> &str {
        &self.context.errand_name
    }

    /// Run the errand and return its one-line summary.
    ///
    /// The job render cache is cleaned exactly once per call, whatever the
    /// outcome. A `true` on `cancel` before the run starts skips it.
    pub async fn run(&self, cancel: watch::Receiver<bool>) -> Result<String> {
        let _cleaner = CacheCleaner(self.planner.job_renderer());
        let ctx = &self.context;

        if !ctx.instance_group.is_errand() {
            return Err(ErrandError::NotLifecycleErrand(ctx.instance_group.name.clone()));
        }
        if *cancel.borrow() {
            return Err(ErrandError::Cancelled(ctx.errand_name.clone()));
        }

        let manager = self
            .managers
            .manager_for(self.planner.as_ref(), &ctx.instance_group);
        let updater = ErrandInstanceUpdater::new(manager, &ctx.errand_name, &ctx.deployment_name);

        info!(
            errand = %ctx.errand_name,
            deployment = %ctx.deployment_name,
            instance = %self.instance.name(),
            keep_alive = %ctx.keep_alive,
            "running errand"
        );
        let result = updater
            .with_updated_instances(&ctx.instance_group, ctx.keep_alive, ctx.changes_exist, || {
                self.runner.run(&self.instance, cancel)
            })
            .await?;

        let summary = result.short_description(&ctx.errand_name);
        info!(errand = %ctx.errand_name, exit_code = result.exit_code, "{summary}");
        Ok(summary)
    }
}
