//! A ledger session: the owned record store plus its local cache and optional
//! remote, with remote-primary / local-fallback persistence.
//!
//! Mutations are applied to the in-memory ledger first and are never rolled
//! back. The local cache is written on every change; the remote is only
//! contacted while it is believed reachable, and any remote failure flips the
//! session to local-only until the next load.

use crate::core::{
    Ledger, LedgerError, LedgerOptions, Record, RecordFilter, RecordKind, RecordStore, Totals,
    compute_totals, filter_records,
};
use crate::remote::RemoteLedger;
use crate::store::LedgerCache;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Session handle shared between user actions and the background reconciler.
pub type SharedSession = Arc<Mutex<LedgerSession>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    /// No remote configured; the session is local-only.
    Disabled,
    Reachable,
    Unreachable,
}

/// Where the ledger came from on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    LocalCache,
    Empty,
}

/// Progress of one optimistic write towards the remote.
///
/// `Local → RemotePending → Reconciled | RemoteFailed`. A write that never
/// leaves `Local` was not sent because the remote is disabled or unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Local,
    RemotePending,
    Reconciled,
    RemoteFailed,
}

impl WriteState {
    fn settle(self, remote_ok: bool) -> Self {
        match (self, remote_ok) {
            (WriteState::RemotePending, true) => WriteState::Reconciled,
            (WriteState::RemotePending, false) => WriteState::RemoteFailed,
            (state, _) => state,
        }
    }
}

/// Result of a mutation together with how far it got towards the remote.
#[derive(Debug, Clone, PartialEq)]
pub struct Written<T> {
    pub value: T,
    pub state: WriteState,
}

pub struct LedgerSession {
    store: RecordStore,
    cache: LedgerCache,
    remote: Option<Arc<dyn RemoteLedger>>,
    status: RemoteStatus,
}

impl LedgerSession {
    /// Creates a session over an empty ledger. Call [`LedgerSession::load`] before use.
    pub fn new(
        store: RecordStore,
        cache: LedgerCache,
        remote: Option<Arc<dyn RemoteLedger>>,
    ) -> Self {
        let status = if remote.is_some() {
            RemoteStatus::Unreachable
        } else {
            RemoteStatus::Disabled
        };
        Self {
            store,
            cache,
            remote,
            status,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn remote_status(&self) -> RemoteStatus {
        self.status
    }

    pub fn ledger(&self) -> &Ledger {
        self.store.ledger()
    }

    pub fn options(&self) -> LedgerOptions {
        self.store.options()
    }

    pub fn today(&self) -> NaiveDate {
        self.store.today()
    }

    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    pub fn view(&self, filter: &RecordFilter) -> Vec<&Record> {
        filter_records(self.store.records(), filter, self.store.options())
    }

    pub fn totals(&self) -> Totals {
        compute_totals(self.store.records(), self.store.options())
    }

    /// Loads the ledger from the remote, falling back to the local cache and
    /// finally to an empty ledger.
    pub async fn load(&mut self) -> LoadSource {
        if let Some(remote) = self.remote.clone() {
            match remote.fetch_ledger().await {
                Ok(ledger) => {
                    self.store.replace_ledger(ledger);
                    self.status = RemoteStatus::Reachable;
                    info!(
                        records = self.store.records().len(),
                        "Loaded ledger from server"
                    );
                    self.save_local().await;
                    return LoadSource::Remote;
                }
                Err(e) => {
                    warn!("Server unavailable, using local cache: {e:#}");
                    self.status = RemoteStatus::Unreachable;
                }
            }
        }

        match self.cache.load().await {
            Ok(Some(ledger)) => {
                self.store.replace_ledger(ledger);
                debug!(
                    records = self.store.records().len(),
                    "Loaded ledger from local cache"
                );
                LoadSource::LocalCache
            }
            Ok(None) => {
                debug!("No cached ledger, starting empty");
                self.reset_to_empty().await;
                LoadSource::Empty
            }
            Err(e) => {
                error!("Cached ledger unreadable, starting empty: {e:#}");
                self.reset_to_empty().await;
                LoadSource::Empty
            }
        }
    }

    async fn reset_to_empty(&mut self) {
        self.store.replace_ledger(Ledger::default());
        self.save_local().await;
    }

    /// Writes the ledger to the local cache. Failures are logged only.
    pub async fn save_local(&self) {
        if let Err(e) = self.cache.save(self.store.ledger()).await {
            error!("Failed to write local cache: {e:#}");
        }
    }

    /// Saves locally, then pushes the full ledger to the remote if it is
    /// reachable and adopts the server's reconciled copy.
    pub async fn save(&mut self) -> WriteState {
        self.save_local().await;
        self.sync_remote().await
    }

    /// Pushes the full ledger to the remote when reachable.
    pub async fn sync_remote(&mut self) -> WriteState {
        let Some(remote) = self.reachable_remote() else {
            return WriteState::Local;
        };

        let state = WriteState::RemotePending;
        match remote.sync_ledger(self.store.ledger()).await {
            Ok(canonical) => {
                self.store.replace_ledger(canonical);
                self.save_local().await;
                debug!("Ledger reconciled with server");
                state.settle(true)
            }
            Err(e) => {
                self.mark_unreachable(&e);
                state.settle(false)
            }
        }
    }

    pub async fn add_record(
        &mut self,
        kind: RecordKind,
        amount: f64,
        category: &str,
        description: &str,
        date: NaiveDate,
    ) -> Result<Written<Record>, LedgerError> {
        let record = self
            .store
            .add_record(kind, amount, category, description, date)?;
        self.save_local().await;
        Ok(self.push_record(record).await)
    }

    pub async fn duplicate_record(&mut self, id: u64) -> Result<Written<Record>, LedgerError> {
        let record = self.store.duplicate_record(id)?;
        self.save_local().await;
        Ok(self.push_record(record).await)
    }

    /// Deletes locally, then asks the remote to do the same. The local delete
    /// stands whatever the remote says.
    pub async fn delete_record(&mut self, id: u64) -> Result<Written<()>, LedgerError> {
        if !self.store.delete_record(id) {
            return Err(LedgerError::NotFound(id));
        }
        self.save_local().await;

        let Some(remote) = self.reachable_remote() else {
            return Ok(Written {
                value: (),
                state: WriteState::Local,
            });
        };
        let state = WriteState::RemotePending;
        let state = match remote.delete_record(id).await {
            Ok(found) => {
                if !found {
                    debug!(id, "Server had no copy of deleted record");
                }
                state.settle(true)
            }
            Err(e) => {
                self.mark_unreachable(&e);
                state.settle(false)
            }
        };
        Ok(Written { value: (), state })
    }

    async fn push_record(&mut self, record: Record) -> Written<Record> {
        let Some(remote) = self.reachable_remote() else {
            return Written {
                value: record,
                state: WriteState::Local,
            };
        };

        let state = WriteState::RemotePending;
        match remote.add_record(&record).await {
            Ok(canonical) => {
                let value = if self.store.replace_record(record.id, canonical.clone()) {
                    self.save_local().await;
                    canonical
                } else {
                    record
                };
                Written {
                    value,
                    state: state.settle(true),
                }
            }
            Err(e) => {
                self.mark_unreachable(&e);
                Written {
                    value: record,
                    state: state.settle(false),
                }
            }
        }
    }

    fn reachable_remote(&self) -> Option<Arc<dyn RemoteLedger>> {
        match self.status {
            RemoteStatus::Reachable => self.remote.clone(),
            _ => None,
        }
    }

    fn mark_unreachable(&mut self, err: &anyhow::Error) {
        warn!("Server unavailable, continuing locally: {err:#}");
        self.status = RemoteStatus::Unreachable;
    }
}
