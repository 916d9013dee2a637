use super::LocalStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "ledger";

/// fjall-backed store under the application's data directory.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl LocalStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.partition.get(key)?;
        debug!(key, hit = value.is_some(), "Disk store GET");
        Ok(value.map(|v| v.to_vec()))
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(key, bytes = value.len(), "Disk store PUT");
        Ok(())
    }
}
