//! director-agent: the director's view of the agent running on each VM.
//!
//! The wire protocol is owned by the transport implementation; this crate
//! only fixes the operations the provisioning core relies on.
//!
//! # Architecture
//!
//! ```text
//! AgentFactory
//!   └── for_agent(agent_id) → AgentHandle
//!       ├── wait_until_ready()   (bounded by the handle's own timeout)
//!       ├── update_settings()    (trusted certificate bundle)
//!       ├── get_state()          (agent-reported state map)
//!       └── apply()              (canonical apply spec)
//! ```
//!
//! Every call is made exactly once per provisioning attempt; retries are
//! not part of this contract.

pub mod error;
pub mod handle;

pub use error::{AgentError, AgentResult};
pub use handle::{AgentFactory, AgentHandle, AgentSettings};
