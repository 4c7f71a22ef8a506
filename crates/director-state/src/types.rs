//! Persisted record types.

use serde::{Deserialize, Serialize};

use director_core::ApplySpec;

/// Cloud-assigned VM identifier.
pub type VmCid = String;

/// A provisioned VM.
///
/// A record exists only for VMs whose agent has accepted at least one apply
/// spec; half-provisioned VMs are never written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VmRecord {
    pub cid: VmCid,
    pub agent_id: String,
    /// Owning deployment name.
    pub deployment: String,
    /// SHA-1 of the certificate bundle the agent accepted.
    pub trusted_certs_sha1: Option<String>,
    /// Last apply spec sent to the agent.
    pub apply_spec: Option<ApplySpec>,
    /// Unix timestamp (seconds) of cloud creation.
    pub created_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentRecord {
    pub name: String,
    /// Raw manifest text, stored as-is.
    pub manifest: Option<String>,
    pub created_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StemcellRecord {
    pub name: String,
    pub version: String,
    /// Image id in the cloud.
    pub cid: String,
}
