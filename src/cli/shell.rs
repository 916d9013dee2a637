//! Interactive ledger shell. Keeps the session open so the background
//! reconciler can push changes while the user works.
use super::records::{NewRecord, is_yes};
use super::{LedgerCommand, execute, ui};
use crate::core::query::parse_month;
use crate::core::{LedgerError, RecordFilter, RecordKind};
use crate::reconcile;
use crate::session::SharedSession;
use anyhow::Result;
use chrono::NaiveDate;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  add <expense|credit|income> <amount> <category> [description] [date=YYYY-MM-DD]
  dup <id>                     repeat an expense with today's date
  del <id>                     delete a record (asks first)
  list [type=..] [category=..] [month=YYYY-MM]
  summary                      totals and balance
  categories                   known categories
  sync                         push the ledger to the server now
  help
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Ledger(LedgerCommand),
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>) -> Result<u64, LedgerError> {
    let arg = arg.ok_or_else(|| LedgerError::Validation("record id is required".to_string()))?;
    arg.parse()
        .map_err(|_| LedgerError::Validation(format!("invalid record id: '{arg}'")))
}

fn parse_add(args: &[&str]) -> Result<LedgerCommand, LedgerError> {
    let mut date = None;
    let mut words = Vec::new();
    for arg in args {
        match arg.strip_prefix("date=") {
            Some(value) => {
                date = Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    LedgerError::Validation(format!("invalid date: '{value}'"))
                })?);
            }
            None => words.push(*arg),
        }
    }

    let [kind, amount, category, description @ ..] = words.as_slice() else {
        return Err(LedgerError::Validation(
            "usage: add <type> <amount> <category> [description]".to_string(),
        ));
    };
    let amount = amount
        .parse::<f64>()
        .map_err(|_| LedgerError::Validation(format!("invalid amount: '{amount}'")))?;

    Ok(LedgerCommand::Add(NewRecord {
        kind: kind.parse()?,
        amount,
        category: category.to_string(),
        description: description.join(" "),
        date,
    }))
}

fn parse_filter(args: &[&str]) -> Result<RecordFilter, LedgerError> {
    let mut filter = RecordFilter::default();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(LedgerError::Validation(format!(
                "expected key=value, got '{arg}'"
            )));
        };
        // An "all" selection clears the filter.
        if value.eq_ignore_ascii_case("all") {
            continue;
        }
        match key {
            "type" => filter.kind = Some(value.parse::<RecordKind>()?),
            "category" => filter.category = Some(value.to_string()),
            "month" => filter.month = Some(parse_month(value)?),
            other => {
                return Err(LedgerError::Validation(format!(
                    "unknown filter: '{other}'"
                )));
            }
        }
    }
    Ok(filter)
}

/// Parses one shell line. Blank lines yield `None`.
pub fn parse_shell_command(line: &str) -> Result<Option<ShellCommand>, LedgerError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_lowercase().as_str() {
        "add" => ShellCommand::Ledger(parse_add(args)?),
        "dup" | "duplicate" => ShellCommand::Ledger(LedgerCommand::Duplicate {
            id: parse_id(args.first().copied())?,
        }),
        "del" | "delete" => ShellCommand::Ledger(LedgerCommand::Delete {
            id: parse_id(args.first().copied())?,
            confirmed: false,
        }),
        "list" | "ls" => ShellCommand::Ledger(LedgerCommand::List(parse_filter(args)?)),
        "summary" => ShellCommand::Ledger(LedgerCommand::Summary),
        "categories" => ShellCommand::Ledger(LedgerCommand::Categories),
        "sync" => ShellCommand::Ledger(LedgerCommand::Sync),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => {
            return Err(LedgerError::Validation(format!(
                "unknown command: '{other}', try 'help'"
            )));
        }
    };
    Ok(Some(command))
}

/// Runs the shell on stdin until `quit` or end of input.
///
/// With `sync_interval` set, a reconciler pushes the ledger in the background
/// and is stopped before the final save.
pub async fn run(
    session: SharedSession,
    currency_symbol: &str,
    sync_interval: Option<Duration>,
) -> Result<()> {
    let reconciler = sync_interval.map(|period| reconcile::spawn(session.clone(), period));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("{}", ui::style_text("expman shell", ui::StyleType::Title));
    println!("{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle));

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_shell_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };

        let command = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ShellCommand::Ledger(LedgerCommand::Delete { id, .. }) => {
                stdout
                    .write_all(
                        format!("Are you sure you want to delete record #{id}? [y/N] ").as_bytes(),
                    )
                    .await?;
                stdout.flush().await?;
                let answer = lines.next_line().await?.unwrap_or_default();
                LedgerCommand::Delete {
                    id,
                    confirmed: is_yes(&answer),
                }
            }
            ShellCommand::Ledger(command) => command,
        };

        let mut guard = session.lock().await;
        match execute(&mut guard, command, currency_symbol).await {
            Ok(output) => println!("{output}"),
            Err(e) => println!("{}", ui::style_text(&format!("{e:#}"), ui::StyleType::Error)),
        }
    }

    if let Some(reconciler) = reconciler {
        reconciler.shutdown().await;
    }
    debug!("Shell closing, saving ledger");
    session.lock().await.save().await;
    Ok(())
}
