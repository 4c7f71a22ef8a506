//! director-cloud: abstraction over the infrastructure API.
//!
//! A `CloudDriver` creates and deletes VMs. It knows nothing about agents
//! or persisted records; `VmCreator` in `director-pool` layers agent id
//! assignment and record construction on top.

pub mod driver;
pub mod error;

pub use driver::CloudDriver;
pub use error::{CloudError, CloudResult};
