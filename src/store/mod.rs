pub mod disk;
pub mod memory;

use crate::core::Ledger;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Key under which the whole ledger is cached.
pub const LEDGER_KEY: &str = "expense_manager_db";

/// A durable byte-oriented key-value store.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Typed access to the cached ledger, stored as JSON `{records, lastId}`.
#[derive(Clone)]
pub struct LedgerCache {
    store: Arc<dyn LocalStore>,
}

impl LedgerCache {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Returns `Ok(None)` when nothing has been cached yet and an error when the
    /// cached value cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<Ledger>> {
        let Some(bytes) = self.store.get(LEDGER_KEY).await? else {
            debug!("Ledger cache MISS");
            return Ok(None);
        };
        let ledger: Ledger =
            serde_json::from_slice(&bytes).context("Failed to parse cached ledger")?;
        debug!(records = ledger.records.len(), "Ledger cache HIT");
        Ok(Some(ledger))
    }

    pub async fn save(&self, ledger: &Ledger) -> Result<()> {
        let bytes = serde_json::to_vec(ledger).context("Failed to serialize ledger")?;
        self.store.put(LEDGER_KEY, &bytes).await?;
        debug!(records = ledger.records.len(), "Ledger cache PUT");
        Ok(())
    }
}
