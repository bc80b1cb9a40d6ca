//! Demo command - switch to a generated demo book of clients

use anyhow::Result;
use clap::Subcommand;
use treasury_core::services::{DemoSeed, DemoService};

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Generate demo clients and switch to them
    #[command(name = "on")]
    On,
    /// Switch back to the real database
    #[command(name = "off")]
    Off {
        /// Also delete the demo database
        #[arg(long)]
        clean: bool,
    },
    /// Show which database is active
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let demo = DemoService::new(&data_dir);

    match command.unwrap_or(DemoCommands::Status) {
        DemoCommands::On => {
            let seed = demo.enable()?;
            print_seed(&seed);
        }
        DemoCommands::Off { clean: true } => {
            demo.disable(true)?;
            output::success("Demo mode off; demo database deleted");
        }
        DemoCommands::Off { clean: false } => {
            demo.disable(false)?;
            output::success("Demo mode off");
            output::info("Demo data kept. Use 'tms demo off --clean' to delete it.");
        }
        DemoCommands::Status => {
            if demo.is_enabled()? {
                output::warning("Demo mode: on (analytics read demo.duckdb)");
            } else {
                output::info("Demo mode: off (analytics read treasury.duckdb)");
            }
        }
    }
    Ok(())
}

fn print_seed(seed: &DemoSeed) {
    output::success(&format!(
        "Demo mode on: {} clients, {} accounts, {} transactions through {}",
        seed.clients.len(),
        seed.accounts,
        seed.transactions,
        seed.through
    ));
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Client", "Industry", "Segment"]);
    for client in &seed.clients {
        table.add_row(vec![
            client.name.as_str(),
            client.industry.as_deref().unwrap_or("-"),
            client.business_segment.as_deref().unwrap_or("-"),
        ]);
    }
    println!("{}", table);
    output::info("Try 'tms summary <client>' with any name above.");
}
