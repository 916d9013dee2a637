//! The remote source of truth for the ledger.

pub mod http;
pub mod util;

use crate::core::{Ledger, Record};
use anyhow::Result;
use async_trait::async_trait;

pub use http::HttpRemote;

/// CRUD access to the server copy of the ledger. Any error means the server
/// could not be reached or did not report success.
#[async_trait]
pub trait RemoteLedger: Send + Sync {
    async fn fetch_ledger(&self) -> Result<Ledger>;

    /// Pushes the full ledger and returns the server's reconciled copy.
    async fn sync_ledger(&self, ledger: &Ledger) -> Result<Ledger>;

    /// Stores one record and returns the server's canonical version of it.
    async fn add_record(&self, record: &Record) -> Result<Record>;

    /// Returns `Ok(false)` if the server did not have the record.
    async fn delete_record(&self, id: u64) -> Result<bool>;
}
