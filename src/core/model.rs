//! Record and ledger types shared by the store, the local cache and the server API.

use super::error::LedgerError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Expense,
    Credit,
    Income,
}

impl RecordKind {
    /// Placeholder used when a record is added without a description.
    pub fn default_description(&self) -> &'static str {
        match self {
            RecordKind::Expense => "Expense",
            RecordKind::Credit => "Credit Card Expense",
            RecordKind::Income => "Income",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Expense => "Expense",
            RecordKind::Credit => "Credit",
            RecordKind::Income => "Income",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RecordKind::Expense => "expense",
                RecordKind::Credit => "credit",
                RecordKind::Income => "income",
            }
        )
    }
}

impl FromStr for RecordKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(RecordKind::Expense),
            "credit" => Ok(RecordKind::Credit),
            "income" => Ok(RecordKind::Income),
            "" => Err(LedgerError::Validation("record type is required".to_string())),
            other => Err(LedgerError::Validation(format!(
                "unknown record type: {other}"
            ))),
        }
    }
}

/// One financial entry.
///
/// `date` is the accounting date chosen by the user, `timestamp` the instant the
/// record was created. Only the former takes part in filtering and sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

/// All records plus the id high-water mark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub last_id: u64,
}

impl Ledger {
    pub fn max_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0)
    }

    /// Raises `last_id` to the largest record id if a stored copy lags behind it.
    pub fn normalized(mut self) -> Self {
        let max_id = self.max_id();
        if self.last_id < max_id {
            tracing::debug!(
                last_id = self.last_id,
                max_id,
                "Ledger lastId behind record ids, repairing"
            );
            self.last_id = max_id;
        }
        self
    }
}

// Timestamps go out as RFC 3339 UTC. The server writes naive ISO-8601 values
// without an offset, which are read back as UTC.
mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}
