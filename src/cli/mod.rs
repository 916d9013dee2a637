pub mod records;
pub mod setup;
pub mod shell;
pub mod summary;
pub mod ui;

use crate::core::RecordFilter;
use crate::session::LedgerSession;
use anyhow::Result;
pub use records::NewRecord;

/// One user action against a loaded ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Add(NewRecord),
    /// Deletion only goes ahead once `confirmed` is set.
    Delete { id: u64, confirmed: bool },
    Duplicate { id: u64 },
    List(RecordFilter),
    Summary,
    Categories,
    Sync,
}

/// Runs `command` and returns the text to show the user.
pub async fn execute(
    session: &mut LedgerSession,
    command: LedgerCommand,
    currency_symbol: &str,
) -> Result<String> {
    let output = match command {
        LedgerCommand::Add(input) => records::add(session, input).await?,
        LedgerCommand::Delete {
            confirmed: false, ..
        } => "Deletion cancelled".to_string(),
        LedgerCommand::Delete { id, .. } => records::delete(session, id).await?,
        LedgerCommand::Duplicate { id } => records::duplicate(session, id).await?,
        LedgerCommand::List(filter) => {
            records::display_records(&session.view(&filter), currency_symbol)
        }
        LedgerCommand::Summary => summary::summary(session, currency_symbol),
        LedgerCommand::Categories => records::display_categories(&session.categories()),
        LedgerCommand::Sync => summary::sync(session).await,
    };
    Ok(output)
}
