//! director-state: embedded state store for the director.
//!
//! Backed by [redb](https://docs.rs/redb), persists the records the director
//! owns: VMs (created only once fully provisioned) and deployments.
//! Stemcell records travel inside pool specs and are not stored here.
//!
//! # Architecture
//!
//! All records are JSON-serialized into redb's `&[u8]` value columns.
//! VMs are keyed by cloud id, deployments by name.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across provisioning tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
