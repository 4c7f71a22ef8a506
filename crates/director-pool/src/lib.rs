//! director-pool: resource pool reconciliation.
//!
//! Finds placeholders in a resource pool that have no backing VM yet and
//! provisions each one concurrently. The reconciler:
//!
//! - Selects unbacked placeholders, optionally narrowed by a filter
//! - Dispatches one provisioning job per placeholder on a bounded `WorkerPool`
//! - Waits for every job to settle, then surfaces the first failure
//!
//! # Architecture
//!
//! ```text
//! ResourcePoolReconciler
//!   └── WorkerPool (semaphore-bounded tokio tasks)
//!       └── VmProvisioner (one job per placeholder)
//!           ├── VmCreator → CloudDriver::create_vm
//!           ├── AgentHandle: wait_until_ready → update_settings → get_state
//!           ├── AgentStateSynchronizer: apply → persist VmRecord
//!           └── on failure: CloudDriver::delete_vm, original error returned
//! ```
//!
//! A `VmRecord` is written to the `StateStore` only after the agent has
//! accepted an apply spec, so a half-provisioned VM is never observable.

pub mod error;
pub mod pool;
pub mod provisioner;
pub mod reconciler;
pub mod synchronizer;
pub mod vm_creator;
pub mod workers;

#[cfg(test)]
mod testing;

pub use error::{PoolError, PoolResult};
pub use pool::{PoolSpec, ResourcePool, VmPlaceholder};
pub use provisioner::{Provision, VmProvisioner};
pub use reconciler::{PlaceholderFilter, ResourcePoolReconciler, has_bound_instance};
pub use synchronizer::AgentStateSynchronizer;
pub use vm_creator::VmCreator;
pub use workers::{WorkerError, WorkerPool};
