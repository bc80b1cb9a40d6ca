//! Status command - show database status and summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Treasury Data Status".bold());
    if ctx.config.demo_mode {
        println!("{}", "(demo mode)".yellow());
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Clients", &status.total_clients.to_string()]);
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Transactions", &status.total_transactions.to_string()]);

    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest) {
        println!("Date range: {} to {}", earliest, latest);
        println!();
    }

    if status.total_clients == 0 {
        println!("No clients yet. Run 'tms demo on' to explore with sample data.");
    }

    Ok(())
}
