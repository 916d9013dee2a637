use super::ui;
use crate::core::{LedgerError, Record, RecordKind};
use crate::session::{LedgerSession, WriteState, Written};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use console::Term;

/// User input for a new record. A missing date means today.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub kind: RecordKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: Option<NaiveDate>,
}

fn sync_note(state: WriteState) -> String {
    match state {
        WriteState::Reconciled => ui::style_text(" (synced)", ui::StyleType::Subtle),
        WriteState::RemoteFailed => ui::style_text(
            " (server unreachable, saved locally)",
            ui::StyleType::Subtle,
        ),
        WriteState::Local | WriteState::RemotePending => String::new(),
    }
}

pub async fn add(session: &mut LedgerSession, input: NewRecord) -> Result<String, LedgerError> {
    let date = input.date.unwrap_or_else(|| session.today());
    let Written { value, state } = session
        .add_record(
            input.kind,
            input.amount,
            &input.category,
            &input.description,
            date,
        )
        .await?;

    let what = match value.kind {
        RecordKind::Credit => "Credit Card Expense",
        kind => kind.label(),
    };
    Ok(format!(
        "{what} #{} added successfully!{}",
        value.id,
        sync_note(state)
    ))
}

pub async fn delete(session: &mut LedgerSession, id: u64) -> Result<String, LedgerError> {
    let Written { state, .. } = session.delete_record(id).await?;
    Ok(format!(
        "Record #{id} deleted successfully!{}",
        sync_note(state)
    ))
}

pub async fn duplicate(session: &mut LedgerSession, id: u64) -> Result<String, LedgerError> {
    let Written { value, state } = session.duplicate_record(id).await?;
    Ok(format!(
        "Expense duplicated with today's date as #{}!{}",
        value.id,
        sync_note(state)
    ))
}

/// Asks on the terminal before a record is deleted.
pub fn confirm_delete(id: u64) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!(
        "Are you sure you want to delete record #{id}? [y/N] "
    ))?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Renders the ledger view as a table, in the order given.
pub fn display_records(records: &[&Record], currency_symbol: &str) -> String {
    if records.is_empty() {
        return ui::style_text(
            "No records found. Add your first expense!",
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Date"),
        ui::header_cell("Type"),
        ui::header_cell("Category"),
        ui::header_cell("Description"),
        ui::header_cell("Amount"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(ui::format_date(record.date)),
            ui::kind_cell(record.kind),
            Cell::new(ui::format_category(&record.category)),
            Cell::new(&record.description),
            ui::amount_cell(record, currency_symbol),
        ]);
    }

    table.to_string()
}

pub fn display_categories(categories: &[String]) -> String {
    if categories.is_empty() {
        return ui::style_text("No categories yet.", ui::StyleType::Subtle);
    }
    categories
        .iter()
        .map(|c| format!("{c:<24} {}", ui::format_category(c)))
        .collect::<Vec<_>>()
        .join("\n")
}
