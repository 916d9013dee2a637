//! The owned, in-memory ledger and the only place records are created or removed.
use super::clock::{Clock, SystemClock};
use super::error::LedgerError;
use super::model::{Ledger, Record, RecordKind};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Constructor-time switches for the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerOptions {
    /// Whether `income` records are accepted and take part in views and totals.
    pub include_income: bool,
}

pub struct RecordStore {
    ledger: Ledger,
    options: LedgerOptions,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    pub fn new(options: LedgerOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    pub fn with_clock(options: LedgerOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Ledger::default(),
            options,
            clock,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn records(&self) -> &[Record] {
        &self.ledger.records
    }

    pub fn last_id(&self) -> u64 {
        self.ledger.last_id
    }

    pub fn options(&self) -> LedgerOptions {
        self.options
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.ledger.records.iter().find(|r| r.id == id)
    }

    /// Validates the input and appends a new record with the next id.
    pub fn add_record(
        &mut self,
        kind: RecordKind,
        amount: f64,
        category: &str,
        description: &str,
        date: NaiveDate,
    ) -> Result<Record, LedgerError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "amount must be a positive number, got {amount}"
            )));
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(LedgerError::Validation("category is required".to_string()));
        }
        if kind == RecordKind::Income && !self.options.include_income {
            return Err(LedgerError::Validation(
                "income records are not enabled for this ledger".to_string(),
            ));
        }

        let description = match description.trim() {
            "" => kind.default_description(),
            text => text,
        };

        Ok(self.insert(kind, amount, category.to_string(), description.to_string(), date))
    }

    /// Removes the record with `id`. Returns false when there is no such record.
    pub fn delete_record(&mut self, id: u64) -> bool {
        let before = self.ledger.records.len();
        self.ledger.records.retain(|r| r.id != id);
        let removed = self.ledger.records.len() < before;
        debug!(id, removed, "Delete record");
        removed
    }

    /// Repeats an expense today: same amount, category and description, fresh id and date.
    pub fn duplicate_record(&mut self, id: u64) -> Result<Record, LedgerError> {
        let original = self.get(id).ok_or(LedgerError::NotFound(id))?;
        if original.kind != RecordKind::Expense {
            return Err(LedgerError::InvalidOperation(format!(
                "only expenses can be duplicated, record {id} is {}",
                original.kind
            )));
        }

        let (kind, amount, category, description) = (
            original.kind,
            original.amount,
            original.category.clone(),
            original.description.clone(),
        );
        let today = self.clock.today();
        Ok(self.insert(kind, amount, category, description, today))
    }

    /// Overwrites the record `id` with a canonical copy returned by the server.
    ///
    /// Returns false, leaving the ledger untouched, when there is no record `id`
    /// or the canonical id already belongs to a different record.
    pub fn replace_record(&mut self, id: u64, canonical: Record) -> bool {
        if canonical.id != id && self.get(canonical.id).is_some() {
            debug!(
                local_id = id,
                canonical_id = canonical.id,
                "Canonical id already taken, keeping local record"
            );
            return false;
        }
        let Some(slot) = self.ledger.records.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if canonical.id > self.ledger.last_id {
            self.ledger.last_id = canonical.id;
        }
        debug!(local_id = id, canonical_id = canonical.id, "Replace record");
        *slot = canonical;
        true
    }

    /// Swaps in a whole ledger, e.g. after a load or a server sync.
    pub fn replace_ledger(&mut self, ledger: Ledger) {
        self.ledger = ledger.normalized();
        debug!(
            records = self.ledger.records.len(),
            last_id = self.ledger.last_id,
            "Ledger replaced"
        );
    }

    /// Distinct category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.ledger
            .records
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn insert(
        &mut self,
        kind: RecordKind,
        amount: f64,
        category: String,
        description: String,
        date: NaiveDate,
    ) -> Record {
        self.ledger.last_id += 1;
        let record = Record {
            id: self.ledger.last_id,
            kind,
            amount,
            category,
            description,
            date,
            timestamp: self.clock.now(),
        };
        self.ledger.records.push(record.clone());
        debug!(id = record.id, kind = %record.kind, amount, "Record added");
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock {
            now: Utc.with_ymd_and_hms(2026, 10, 18, 6, 30, 0).unwrap(),
            today: date(2026, 10, 18),
        })
    }

    fn store() -> RecordStore {
        RecordStore::with_clock(LedgerOptions::default(), clock())
    }

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut store = store();

        let first = store
            .add_record(RecordKind::Expense, 120.0, "food", "Lunch", date(2026, 10, 1))
            .unwrap();
        let second = store
            .add_record(RecordKind::Credit, 80.0, "axis_card", "", date(2026, 10, 2))
            .unwrap();
        let third = store
            .add_record(RecordKind::Expense, 5.5, "transport", "Bus", date(2026, 10, 3))
            .unwrap();

        assert_eq!((first.id, second.id, third.id), (1, 2, 3));
        assert_eq!(store.last_id(), 3);
        assert_eq!(store.records().len(), 3);
        assert_eq!(first.timestamp, clock().now);
    }

    #[test]
    fn test_add_continues_from_loaded_high_water_mark() {
        let mut store = store();
        store.replace_ledger(Ledger {
            records: Vec::new(),
            last_id: 41,
        });

        let record = store
            .add_record(RecordKind::Expense, 10.0, "misc", "", date(2026, 10, 1))
            .unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(store.last_id(), 42);
    }

    #[test]
    fn test_add_rejects_bad_amounts() {
        let mut store = store();
        for amount in [0.0, -12.0, f64::NAN, f64::INFINITY] {
            let result =
                store.add_record(RecordKind::Expense, amount, "food", "", date(2026, 10, 1));
            assert!(matches!(result, Err(LedgerError::Validation(_))), "{amount}");
        }
        assert!(store.records().is_empty());
        assert_eq!(store.last_id(), 0);
    }

    #[test]
    fn test_add_rejects_blank_category() {
        let mut store = store();
        let result = store.add_record(RecordKind::Expense, 10.0, "   ", "", date(2026, 10, 1));
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(store.last_id(), 0);
    }

    #[test]
    fn test_add_income_requires_capability() {
        let mut store = store();
        let result = store.add_record(RecordKind::Income, 500.0, "salary", "", date(2026, 10, 1));
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let mut store = RecordStore::with_clock(
            LedgerOptions {
                include_income: true,
            },
            clock(),
        );
        let record = store
            .add_record(RecordKind::Income, 500.0, "salary", "", date(2026, 10, 1))
            .unwrap();
        assert_eq!(record.description, "Income");
    }

    #[test]
    fn test_empty_description_uses_kind_placeholder() {
        let mut store = store();
        let expense = store
            .add_record(RecordKind::Expense, 10.0, "food", "  ", date(2026, 10, 1))
            .unwrap();
        let credit = store
            .add_record(RecordKind::Credit, 10.0, "hdfc", "", date(2026, 10, 1))
            .unwrap();
        assert_eq!(expense.description, "Expense");
        assert_eq!(credit.description, "Credit Card Expense");
    }

    #[test]
    fn test_delete_keeps_last_id() {
        let mut store = store();
        store
            .add_record(RecordKind::Expense, 10.0, "food", "", date(2026, 10, 1))
            .unwrap();
        store
            .add_record(RecordKind::Expense, 20.0, "food", "", date(2026, 10, 2))
            .unwrap();

        assert!(store.delete_record(2));
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.last_id(), 2);

        let next = store
            .add_record(RecordKind::Expense, 30.0, "food", "", date(2026, 10, 3))
            .unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_delete_missing_id_changes_nothing() {
        let mut store = store();
        store
            .add_record(RecordKind::Expense, 10.0, "food", "", date(2026, 10, 1))
            .unwrap();
        let before = store.ledger().clone();

        assert!(!store.delete_record(99));
        assert_eq!(store.ledger(), &before);
    }

    #[test]
    fn test_duplicate_expense_uses_today() {
        let mut store = store();
        let original = store
            .add_record(RecordKind::Expense, 45.0, "coffee", "Flat white", date(2025, 1, 9))
            .unwrap();

        let copy = store.duplicate_record(original.id).unwrap();

        assert_eq!(copy.id, 2);
        assert_eq!(copy.amount, 45.0);
        assert_eq!(copy.category, "coffee");
        assert_eq!(copy.description, "Flat white");
        assert_eq!(copy.date, date(2026, 10, 18));
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn test_duplicate_credit_is_rejected() {
        let mut store = store();
        let credit = store
            .add_record(RecordKind::Credit, 45.0, "amex", "", date(2026, 10, 1))
            .unwrap();
        let before = store.ledger().clone();

        let result = store.duplicate_record(credit.id);
        assert!(matches!(result, Err(LedgerError::InvalidOperation(_))));
        assert_eq!(store.ledger(), &before);
    }

    #[test]
    fn test_duplicate_missing_id() {
        let mut store = store();
        assert_eq!(store.duplicate_record(5), Err(LedgerError::NotFound(5)));
    }

    #[test]
    fn test_replace_record_raises_last_id() {
        let mut store = store();
        let local = store
            .add_record(RecordKind::Expense, 10.0, "food", "", date(2026, 10, 1))
            .unwrap();

        let canonical = Record {
            id: 17,
            ..local.clone()
        };
        assert!(store.replace_record(local.id, canonical));
        assert_eq!(store.records()[0].id, 17);
        assert_eq!(store.last_id(), 17);

        assert!(!store.replace_record(1, local));
    }

    #[test]
    fn test_replace_record_refuses_taken_id() {
        let mut store = store();
        let first = store
            .add_record(RecordKind::Expense, 10.0, "food", "", date(2026, 10, 1))
            .unwrap();
        let second = store
            .add_record(RecordKind::Credit, 20.0, "amex", "", date(2026, 10, 2))
            .unwrap();
        let before = store.ledger().clone();

        let clash = Record {
            id: first.id,
            ..second.clone()
        };
        assert!(!store.replace_record(second.id, clash));
        assert_eq!(store.ledger(), &before);

        // Same id is a plain overwrite.
        let same = Record {
            amount: 25.0,
            ..second.clone()
        };
        assert!(store.replace_record(second.id, same));
        assert_eq!(store.get(second.id).map(|r| r.amount), Some(25.0));
    }

    #[test]
    fn test_categories_are_sorted_and_unique() {
        let mut store = store();
        for category in ["travel", "food", "travel", "bills"] {
            store
                .add_record(RecordKind::Expense, 1.0, category, "", date(2026, 10, 1))
                .unwrap();
        }
        assert_eq!(store.categories(), vec!["bills", "food", "travel"]);
    }
}
