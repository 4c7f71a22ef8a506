//! director-errand: instance lifecycle for errand runs.
//!
//! A lifecycle errand runs on an instance that only needs to exist while
//! the errand runs. One run goes through:
//!
//! ```text
//! LifecycleErrandStep::run
//!   ├── (drop guard) JobRenderer::clean_cache, on every exit path
//!   └── ErrandInstanceUpdater::with_updated_instances
//!       ├── InstanceGroupManager: create_missing_vms, update_instances
//!       ├── Runner::run → ErrandResult
//!       └── KeepAlive decides: keep the instances or delete_vms
//! ```
//!
//! # Components
//!
//! - **`keep_alive`**: Tri-state keep/teardown policy
//! - **`result`**: Errand exit status and its one-line summary
//! - **`manager`**: Collaborator traits (instance groups, runner, renderer)
//! - **`updater`**: Scoped provision / run / teardown
//! - **`step`**: The errand step itself

pub mod error;
pub mod keep_alive;
pub mod manager;
pub mod result;
pub mod step;
pub mod updater;

#[cfg(test)]
mod testing;

pub use error::{ErrandError, Result};
pub use keep_alive::KeepAlive;
pub use manager::{
    DeploymentPlanner, InstanceGroupManager, InstanceGroupManagerFactory, JobRenderer, Runner,
};
pub use result::ErrandResult;
pub use step::{ErrandContext, LifecycleErrandStep};
pub use updater::ErrandInstanceUpdater;
