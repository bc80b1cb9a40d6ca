//! Output formatting utilities

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print a bold section header followed by a blank line
pub fn header(title: &str) {
    println!("{}", title.bold());
    println!();
}

/// Pretty-print any serializable value as JSON
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Right-aligned cell for numeric columns
pub fn number_cell(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

/// Format money with thousands separators and two decimals
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}.{}", grouped, fraction)
    } else {
        format!("${}.{}", grouped, fraction)
    }
}

/// Money for f64 values produced by statistics
pub fn money_f64(amount: f64) -> String {
    money(Decimal::from_f64_retain(amount).unwrap_or_default())
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Signed percent change, green when up and red when down
pub fn change(value: f64) -> ColoredString {
    let text = format!("{:+.1}%", value);
    if value > 0.0 {
        text.green()
    } else if value < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

/// Colored trend label
pub fn trend(label: &str) -> ColoredString {
    match label {
        "up" => "▲ up".green(),
        "down" => "▼ down".red(),
        "new" => "◆ new".cyan(),
        other => other.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_grouping() {
        assert_eq!(money(Decimal::new(123456789, 2)), "$1,234,567.89");
        assert_eq!(money(Decimal::new(-50000, 2)), "-$500.00");
        assert_eq!(money(Decimal::ZERO), "$0.00");
        assert_eq!(money(Decimal::new(100000, 0)), "$100,000.00");
    }
}
