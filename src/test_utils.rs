//! In-process doubles for the remote and the local store.
use crate::core::{Ledger, Record, RecordKind};
use crate::remote::RemoteLedger;
use crate::store::LocalStore;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Behaves like the expense server: assigns ids on add and merges by id on sync.
pub struct MockRemote {
    ledger: Mutex<Ledger>,
    online: AtomicBool,
    added: AtomicUsize,
    syncs: AtomicUsize,
}

impl MockRemote {
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            online: AtomicBool::new(true),
            added: AtomicUsize::new(0),
            syncs: AtomicUsize::new(0),
        }
    }

    pub fn offline() -> Self {
        let remote = Self::with_ledger(Ledger::default());
        remote.set_online(false);
        remote
    }

    /// `[expense 100 on 2026-10-01, credit 50 on 2026-10-05]`, lastId 2.
    pub fn sample_ledger() -> Ledger {
        let record = |id: u64, kind: RecordKind, amount: f64, category: &str, day: u32| Record {
            id,
            kind,
            amount,
            category: category.to_string(),
            description: kind.default_description().to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap(),
        };
        Ledger {
            records: vec![
                record(1, RecordKind::Expense, 100.0, "food", 1),
                record(2, RecordKind::Credit, 50.0, "amex", 5),
            ],
            last_id: 2,
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger.lock().unwrap().clone()
    }

    pub fn added(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if !self.online.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteLedger for MockRemote {
    async fn fetch_ledger(&self) -> Result<Ledger> {
        self.check_online()?;
        Ok(self.ledger())
    }

    async fn sync_ledger(&self, local: &Ledger) -> Result<Ledger> {
        self.check_online()?;
        self.syncs.fetch_add(1, Ordering::SeqCst);

        let mut server = self.ledger.lock().unwrap();
        for record in &local.records {
            match server.records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => server.records.push(record.clone()),
            }
        }
        server.last_id = server.last_id.max(local.last_id).max(server.max_id());
        Ok(server.clone())
    }

    async fn add_record(&self, record: &Record) -> Result<Record> {
        self.check_online()?;
        self.added.fetch_add(1, Ordering::SeqCst);

        let mut server = self.ledger.lock().unwrap();
        server.last_id += 1;
        let canonical = Record {
            id: server.last_id,
            ..record.clone()
        };
        server.records.push(canonical.clone());
        Ok(canonical)
    }

    async fn delete_record(&self, id: u64) -> Result<bool> {
        self.check_online()?;
        let mut server = self.ledger.lock().unwrap();
        let before = server.records.len();
        server.records.retain(|r| r.id != id);
        Ok(server.records.len() < before)
    }
}

/// A local store whose disk is always full.
pub struct FailingStore;

#[async_trait]
impl LocalStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(anyhow!("storage unavailable"))
    }

    async fn put(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Err(anyhow!("quota exceeded"))
    }
}
