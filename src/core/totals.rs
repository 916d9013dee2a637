use super::model::{Record, RecordKind};
use super::record_store::LedgerOptions;

/// Running totals over the whole ledger, ignoring any active filter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub total_expense: f64,
    pub total_credit_debt: f64,
    /// `None` when the ledger does not track income.
    pub total_income: Option<f64>,
    pub balance: f64,
}

pub fn compute_totals(records: &[Record], options: LedgerOptions) -> Totals {
    let (mut expense, mut credit, mut income) = (0.0, 0.0, 0.0);
    for record in records {
        match record.kind {
            RecordKind::Expense => expense += record.amount,
            RecordKind::Credit => credit += record.amount,
            RecordKind::Income => income += record.amount,
        }
    }

    if options.include_income {
        Totals {
            total_expense: expense,
            total_credit_debt: credit,
            total_income: Some(income),
            balance: income - expense - credit,
        }
    } else {
        Totals {
            total_expense: expense,
            total_credit_debt: credit,
            total_income: None,
            balance: -(expense + credit),
        }
    }
}
