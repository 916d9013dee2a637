pub mod cli;
pub mod core;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod store;
#[cfg(test)]
mod test_utils;

use crate::cli::{LedgerCommand, records, ui};
use crate::core::RecordStore;
use crate::core::config::AppConfig;
use crate::remote::RemoteLedger;
use crate::remote::util::RetryPolicy;
use crate::session::LedgerSession;
use crate::store::LedgerCache;
use crate::store::disk::DiskStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Ledger(LedgerCommand),
    Shell,
}

/// Builds a session from the configuration and loads the ledger.
pub async fn open_session(config: &AppConfig) -> Result<LedgerSession> {
    let data_path = config.default_data_path()?;
    let cache = LedgerCache::new(Arc::new(DiskStore::open(&data_path)?));

    let remote = match &config.remote {
        Some(remote_config) => {
            let retry = RetryPolicy {
                retries: remote_config.retries,
                delay: Duration::from_millis(500),
            };
            let remote = remote::HttpRemote::new(
                &remote_config.base_url,
                remote_config.timeout(),
                retry,
            )?;
            Some(Arc::new(remote) as Arc<dyn RemoteLedger>)
        }
        None => None,
    };

    let spinner = remote
        .is_some()
        .then(|| ui::new_spinner("Loading ledger from server..."));

    let mut session = LedgerSession::new(
        RecordStore::new(config.ledger_options()),
        cache,
        remote,
    );
    let source = session.load().await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    debug!(
        ?source,
        status = ?session.remote_status(),
        records = session.ledger().records.len(),
        "Session ready"
    );
    Ok(session)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Expense manager starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut session = open_session(&config).await?;

    match command {
        AppCommand::Ledger(command) => {
            let command = match command {
                LedgerCommand::Delete {
                    id,
                    confirmed: false,
                } => LedgerCommand::Delete {
                    id,
                    confirmed: records::confirm_delete(id)?,
                },
                other => other,
            };
            let output = cli::execute(&mut session, command, &config.currency_symbol).await?;
            println!("{output}");
            Ok(())
        }
        AppCommand::Shell => {
            let sync_interval = config.remote.as_ref().map(|r| r.sync_interval());
            cli::shell::run(
                session.into_shared(),
                &config.currency_symbol,
                sync_interval,
            )
            .await
        }
    }
}
