use super::ui;
use crate::core::Totals;
use crate::session::{LedgerSession, RemoteStatus, WriteState};
use comfy_table::{Cell, CellAlignment};

impl Totals {
    pub fn display_as_table(&self, currency_symbol: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Summary"), ui::header_cell("Amount")]);

        let money = |v: f64| {
            Cell::new(ui::format_currency(v, currency_symbol)).set_alignment(CellAlignment::Right)
        };
        table.add_row(vec![Cell::new("Total Expense"), money(self.total_expense)]);
        table.add_row(vec![
            Cell::new("Credit Card Debt"),
            money(self.total_credit_debt),
        ]);
        if let Some(income) = self.total_income {
            table.add_row(vec![Cell::new("Total Income"), money(income)]);
        }

        let balance_style = if self.balance < 0.0 {
            ui::StyleType::Negative
        } else {
            ui::StyleType::Positive
        };

        let mut output = format!("{}\n\n", ui::style_text("Ledger", ui::StyleType::Title));
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Balance", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_currency(self.balance, currency_symbol),
                balance_style
            )
        ));
        output
    }
}

pub fn summary(session: &LedgerSession, currency_symbol: &str) -> String {
    session.totals().display_as_table(currency_symbol)
}

/// Pushes the whole ledger and reports the outcome.
pub async fn sync(session: &mut LedgerSession) -> String {
    match session.save().await {
        WriteState::Reconciled => format!(
            "Synced {} records with server",
            session.ledger().records.len()
        ),
        WriteState::RemoteFailed => ui::style_text(
            "Server unreachable, changes kept locally",
            ui::StyleType::Subtle,
        ),
        WriteState::Local | WriteState::RemotePending => match session.remote_status() {
            RemoteStatus::Disabled => "No server configured, ledger saved locally".to_string(),
            _ => ui::style_text(
                "Server unreachable, changes kept locally",
                ui::StyleType::Subtle,
            ),
        },
    }
}
