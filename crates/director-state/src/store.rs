//! StateStore: redb-backed persistence for director records.
//!
//! Typed access to the VM and deployment records. Values are JSON in redb's
//! `&[u8]` value columns. On-disk and in-memory (testing) backends.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableHandle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Closure turning a redb error into `StateError::Storage` for step `$op`.
macro_rules! storage {
    ($op:literal) => {
        |e| StateError::Storage {
            op: $op,
            message: e.to_string(),
        }
    };
}

fn bad_record(table: Table) -> impl FnOnce(serde_json::Error) -> StateError {
    move |e| StateError::Record {
        table: table.name().to_string(),
        message: e.to_string(),
    }
}

type Table = TableDefinition<'static, &'static str, &'static [u8]>;

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(|e| StateError::Open(e.to_string()))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(|e| StateError::Open(e.to_string()))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(storage!("begin"))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(VMS).map_err(storage!("open table"))?;
        txn.open_table(DEPLOYMENTS).map_err(storage!("open table"))?;
        txn.commit().map_err(storage!("commit"))?;
        Ok(())
    }

    // ── VMs ────────────────────────────────────────────────────────

    /// Insert or update a VM record.
    pub fn put_vm(&self, vm: &VmRecord) -> StateResult<()> {
        self.put(VMS, &vm.cid, vm)?;
        debug!(cid = %vm.cid, agent_id = %vm.agent_id, "vm stored");
        Ok(())
    }

    /// Get a VM by cloud id.
    pub fn get_vm(&self, cid: &str) -> StateResult<Option<VmRecord>> {
        self.get(VMS, cid)
    }

    /// Find the VM running the given agent.
    pub fn find_vm_by_agent_id(&self, agent_id: &str) -> StateResult<Option<VmRecord>> {
        Ok(self
            .list::<VmRecord>(VMS)?
            .into_iter()
            .find(|vm| vm.agent_id == agent_id))
    }

    /// List all VMs.
    pub fn list_vms(&self) -> StateResult<Vec<VmRecord>> {
        self.list(VMS)
    }

    /// List the VMs owned by a deployment.
    pub fn list_vms_for_deployment(&self, deployment: &str) -> StateResult<Vec<VmRecord>> {
        Ok(self
            .list::<VmRecord>(VMS)?
            .into_iter()
            .filter(|vm| vm.deployment == deployment)
            .collect())
    }

    /// Atomically modify a single VM record.
    ///
    /// The read and the write happen inside one write transaction, so
    /// concurrent updates to the same record never interleave.
    pub fn update_vm<F>(&self, cid: &str, f: F) -> StateResult<VmRecord>
    where
        F: FnOnce(&mut VmRecord),
    {
        let txn = self.db.begin_write().map_err(storage!("begin"))?;
        let record = {
            let mut table = txn.open_table(VMS).map_err(storage!("open table"))?;
            let current: Option<VmRecord> = match table.get(cid).map_err(storage!("read"))? {
                Some(guard) => {
                    Some(serde_json::from_slice(guard.value()).map_err(bad_record(VMS))?)
                }
                None => None,
            };
            let mut record = current.ok_or_else(|| StateError::VmNotFound(cid.to_string()))?;
            f(&mut record);
            let value = serde_json::to_vec(&record).map_err(bad_record(VMS))?;
            table
                .insert(cid, value.as_slice())
                .map_err(storage!("write"))?;
            record
        };
        txn.commit().map_err(storage!("commit"))?;
        debug!(%cid, "vm updated");
        Ok(record)
    }

    // ── Deployments ────────────────────────────────────────────────

    /// Insert or update a deployment record.
    pub fn put_deployment(&self, deployment: &DeploymentRecord) -> StateResult<()> {
        self.put(DEPLOYMENTS, &deployment.name, deployment)
    }

    /// Get a deployment by name.
    pub fn get_deployment(&self, name: &str) -> StateResult<Option<DeploymentRecord>> {
        self.get(DEPLOYMENTS, name)
    }

    /// List all deployments.
    pub fn list_deployments(&self) -> StateResult<Vec<DeploymentRecord>> {
        self.list(DEPLOYMENTS)
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn put<T: Serialize>(&self, table_def: Table, key: &str, value: &T) -> StateResult<()> {
        let value = serde_json::to_vec(value).map_err(bad_record(table_def))?;
        let txn = self.db.begin_write().map_err(storage!("begin"))?;
        {
            let mut table = txn.open_table(table_def).map_err(storage!("open table"))?;
            table
                .insert(key, value.as_slice())
                .map_err(storage!("write"))?;
        }
        txn.commit().map_err(storage!("commit"))?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, table_def: Table, key: &str) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(storage!("begin"))?;
        let table = txn.open_table(table_def).map_err(storage!("open table"))?;
        match table.get(key).map_err(storage!("read"))? {
            Some(guard) => {
                let value: T =
                    serde_json::from_slice(guard.value()).map_err(bad_record(table_def))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn list<T: DeserializeOwned>(&self, table_def: Table) -> StateResult<Vec<T>> {
        let txn = self.db.begin_read().map_err(storage!("begin"))?;
        let table = txn.open_table(table_def).map_err(storage!("open table"))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(storage!("read"))? {
            let (_, value) = entry.map_err(storage!("read"))?;
            let record: T =
                serde_json::from_slice(value.value()).map_err(bad_record(table_def))?;
            results.push(record);
        }
        Ok(results)
    }
}
