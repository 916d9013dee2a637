use crate::core::{Record, RecordKind};
use chrono::NaiveDate;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    Positive,
    Negative,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::Positive => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an amount with two decimals and Indian digit grouping, e.g. `₹1,23,456.78`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.');
    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        symbol,
        group_indian(whole),
        fraction
    )
}

// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Turns a category identifier like `food_dining` into `Food Dining`.
pub fn format_category(category: &str) -> String {
    category
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Signed, colour-coded amount cell: outgoing money is red, income green.
pub fn amount_cell(record: &Record, symbol: &str) -> Cell {
    let (sign, color) = match record.kind {
        RecordKind::Income => ("+", Color::Green),
        RecordKind::Expense | RecordKind::Credit => ("-", Color::Red),
    };
    Cell::new(format!("{sign}{}", format_currency(record.amount, symbol)))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn kind_cell(kind: RecordKind) -> Cell {
    let color = match kind {
        RecordKind::Expense => Color::Yellow,
        RecordKind::Credit => Color::Magenta,
        RecordKind::Income => Color::Green,
    };
    Cell::new(kind.label()).fg(color)
}

/// Creates a spinner shown while the ledger is fetched from the server.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(0.0, "₹"), "₹0.00");
        assert_eq!(format_currency(999.5, "₹"), "₹999.50");
        assert_eq!(format_currency(1000.0, "₹"), "₹1,000.00");
        assert_eq!(format_currency(123456.789, "₹"), "₹1,23,456.79");
        assert_eq!(format_currency(12345678.0, "$"), "$1,23,45,678.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-150.0, "₹"), "-₹150.00");
        assert_eq!(format_currency(-0.0, "₹"), "₹0.00");
        assert_eq!(format_currency(-0.001, "₹"), "₹0.00");
    }

    #[test]
    fn test_format_category() {
        assert_eq!(format_category("food_dining"), "Food Dining");
        assert_eq!(format_category("rent"), "Rent");
        assert_eq!(format_category("hdfc_Millennia"), "Hdfc Millennia");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
        assert_eq!(format_date(date), "8 Oct 2026");
    }
}
