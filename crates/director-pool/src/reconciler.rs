//! Resource pool reconciliation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{PoolError, PoolResult};
use crate::pool::{ResourcePool, VmPlaceholder};
use crate::provisioner::Provision;
use crate::workers::WorkerPool;

/// Narrows the set of placeholders a reconciliation pass provisions.
pub type PlaceholderFilter<'a> = &'a (dyn Fn(&VmPlaceholder) -> bool + Sync);

/// True for placeholders that already have an instance bound to them.
pub fn has_bound_instance(placeholder: &VmPlaceholder) -> bool {
    placeholder.bound_instance().is_some()
}

/// Brings a resource pool up to its declared size.
pub struct ResourcePoolReconciler<P> {
    provisioner: Arc<P>,
}

impl<P: Provision + 'static> ResourcePoolReconciler<P> {
    pub fn new(provisioner: Arc<P>) -> Self {
        Self { provisioner }
    }

    /// Provision every placeholder with no VM that passes `filter`.
    ///
    /// All jobs run to completion even when some fail; the first failure is
    /// returned afterwards. Returns the number of placeholders provisioned.
    pub async fn reconcile(
        &self,
        pool: &ResourcePool,
        workers: &WorkerPool,
        filter: Option<PlaceholderFilter<'_>>,
    ) -> PoolResult<usize> {
        let mut targets = Vec::new();
        for placeholder in pool.placeholders() {
            if placeholder.has_model().await {
                continue;
            }
            if filter.is_some_and(|keep| !keep(placeholder.as_ref())) {
                continue;
            }
            targets.push(placeholder.clone());
        }

        if targets.is_empty() {
            debug!(pool = %pool.name(), "no missing vms");
            return Ok(0);
        }

        info!(
            pool = %pool.name(),
            missing = targets.len(),
            max_threads = workers.max_threads(),
            "creating missing vms"
        );

        let jobs = targets.into_iter().map(|placeholder| {
            let provisioner = self.provisioner.clone();
            let spec = pool.spec().clone();
            async move { provisioner.provision(&spec, &placeholder).await }
        });

        let created = workers.process::<_, _, PoolError>(jobs).await?;
        info!(pool = %pool.name(), created, "missing vms created");
        Ok(created)
    }

    /// Provision every placeholder without a VM.
    pub async fn create_missing_vms(
        &self,
        pool: &ResourcePool,
        workers: &WorkerPool,
    ) -> PoolResult<usize> {
        self.reconcile(pool, workers, None).await
    }

    /// Provision only placeholders that have an instance bound to them.
    pub async fn create_bound_missing_vms(
        &self,
        pool: &ResourcePool,
        workers: &WorkerPool,
    ) -> PoolResult<usize> {
        let filter: PlaceholderFilter<'_> = &has_bound_instance;
        self.reconcile(pool, workers, Some(filter)).await
    }
}
