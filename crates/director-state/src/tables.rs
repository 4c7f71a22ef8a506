//! redb table definitions for the director state store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized records).

use redb::TableDefinition;

/// VM records keyed by cloud id.
pub const VMS: TableDefinition<&str, &[u8]> = TableDefinition::new("vms");

/// Deployment records keyed by name.
pub const DEPLOYMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("deployments");
