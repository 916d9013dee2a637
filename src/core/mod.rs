//! Core ledger types and the pure operations over them

pub mod clock;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod query;
pub mod record_store;
pub mod totals;

// Re-export main types for cleaner imports
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::LedgerError;
pub use model::{Ledger, Record, RecordKind};
pub use query::{RecordFilter, filter_records};
pub use record_store::{LedgerOptions, RecordStore};
pub use totals::{Totals, compute_totals};
