//! Filtered, date-ordered views over the ledger.
use super::error::LedgerError;
use super::model::{Record, RecordKind};
use super::record_store::LedgerOptions;
use chrono::{Datelike, NaiveDate};

/// Current filter selections. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub kind: Option<RecordKind>,
    pub category: Option<String>,
    /// Any date inside the wanted month; the day is ignored.
    pub month: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if self.kind.is_some_and(|kind| record.kind != kind) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| record.category != category)
        {
            return false;
        }
        if let Some(month) = self.month
            && (record.date.year() != month.year() || record.date.month() != month.month())
        {
            return false;
        }
        true
    }
}

/// Returns the records passing `filter`, newest date first.
///
/// Income records are left out unless the ledger was built with income enabled.
/// The ordering of records sharing a date is unspecified.
pub fn filter_records<'a>(
    records: &'a [Record],
    filter: &RecordFilter,
    options: LedgerOptions,
) -> Vec<&'a Record> {
    let mut view: Vec<&Record> = records
        .iter()
        .filter(|r| options.include_income || r.kind != RecordKind::Income)
        .filter(|r| filter.matches(r))
        .collect();
    view.sort_by(|a, b| b.date.cmp(&a.date));
    view
}

/// Parses a month selection given as `YYYY-MM` or a full `YYYY-MM-DD` date.
pub fn parse_month(input: &str) -> Result<NaiveDate, LedgerError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d"))
        .map_err(|_| LedgerError::Validation(format!("invalid month: '{input}'")))
}
