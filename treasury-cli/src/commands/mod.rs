//! CLI command implementations

pub mod accounts;
pub mod benchmark;
pub mod cash_flow;
pub mod categories;
pub mod clients;
pub mod dashboard;
pub mod demo;
pub mod export;
pub mod forecast;
pub mod liquidity;
pub mod overview;
pub mod patterns;
pub mod recommend;
pub mod status;
pub mod summary;
pub mod trends;
pub mod vendors;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use uuid::Uuid;

use treasury_core::{Error, TransactionFilter, TransactionType, TreasuryContext};

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TREASURY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".treasury"))
        .context("Could not find home directory; set TREASURY_DIR")
}

/// Get or create treasury context
pub fn get_context() -> Result<TreasuryContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    TreasuryContext::new(&data_dir).context("Failed to initialize treasury context")
}

/// Resolve a client argument given as an id or a (case-insensitive) name
///
/// Unknown ids are passed through so the service reports them as not found.
pub fn resolve_client(ctx: &TreasuryContext, client: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(client) {
        return Ok(id);
    }

    let needle = client.to_lowercase();
    let matches: Vec<_> = ctx
        .repository
        .query_clients()?
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [only] => Ok(only.id),
        [] => Err(Error::not_found(format!(
            "No client matches '{}'. Run 'tms clients' to list them.",
            client
        ))
        .into()),
        many => {
            if let Some(exact) = many.iter().find(|c| c.name.to_lowercase() == needle) {
                return Ok(exact.id);
            }
            let names: Vec<&str> = many.iter().map(|c| c.name.as_str()).collect();
            Err(Error::bad_request(format!("'{}' is ambiguous: {}", client, names.join(", "))).into())
        }
    }
}

/// Reference date for relative windows
pub fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

/// Transaction filter flags shared by the filtered analytics commands
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Start date (inclusive, YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Restrict to one account
    #[arg(long)]
    pub account: Option<Uuid>,
    /// Categories to include (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub category: Vec<String>,
    /// Transaction types to include (comma-separated, e.g. ach,wire)
    #[arg(long = "type", value_delimiter = ',')]
    pub types: Vec<TransactionType>,
    /// Minimum signed amount
    #[arg(long, allow_hyphen_values = true)]
    pub min_amount: Option<Decimal>,
    /// Maximum signed amount
    #[arg(long, allow_hyphen_values = true)]
    pub max_amount: Option<Decimal>,
}

impl FilterArgs {
    pub fn into_filter(self) -> Result<TransactionFilter> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to < from {
                return Err(Error::bad_request(format!(
                    "--to ({}) must not be before --from ({})",
                    to, from
                ))
                .into());
            }
        }
        Ok(TransactionFilter {
            start_date: self.from,
            end_date: self.to,
            account_id: self.account,
            categories: self.category,
            types: self.types,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        })
    }
}
