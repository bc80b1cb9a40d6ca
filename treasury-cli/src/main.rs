//! Treasury CLI - client cash analytics in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use treasury_core::analytics::{CompareMode, DateRangeToken, Lookback, Period, TrendMetric};

mod commands;
mod output;

use commands::{
    accounts, benchmark, cash_flow, categories, clients, dashboard, demo, export, forecast,
    liquidity, overview, patterns, recommend, status, summary, trends, vendors, FilterArgs,
};

/// Treasury analytics for relationship managers
#[derive(Parser)]
#[command(name = "tms", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show database status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List clients
    Clients {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a client's accounts
    Accounts {
        /// Client id or name
        client: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// Inflow, outflow, balance and liquidity headline numbers
    Overview {
        /// Client id or name
        client: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cash flow grouped by period
    CashFlow {
        /// Client id or name
        client: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Bucket size: daily, weekly, monthly or yearly
        #[arg(long, default_value = "monthly")]
        period: Period,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Spend by category, with trends when --from and --to are given
    Categories {
        /// Client id or name
        client: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Top vendors by spend
    Vendors {
        /// Client id or name
        client: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Liquidity score over recent activity
    Liquidity {
        /// Client id or name
        client: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Spending patterns per category
    Patterns {
        /// Client id or name
        client: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Month-over-month trend for one metric
    Trends {
        /// Client id or name
        client: String,
        /// inflow, outflow, balance or transactions
        #[arg(long, default_value = "inflow")]
        metric: TrendMetric,
        /// Lookback in months, e.g. 12m
        #[arg(long, default_value = "12m")]
        lookback: Lookback,
        /// Reference date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project daily flows and balance
    Forecast {
        /// Client id or name
        client: String,
        /// Days to forecast (1-365)
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Starting confidence (0.1-1.0)
        #[arg(long, default_value_t = 0.95)]
        confidence: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare liquidity with the client's industry segment
    Benchmark {
        /// Client id or name
        client: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// KPIs for a relative date range
    Dashboard {
        /// Client id or name
        client: String,
        /// 7d, 30d, 90d, 6m or 1y
        #[arg(long, default_value = "30d")]
        range: DateRangeToken,
        /// none, previous or year_over_year
        #[arg(long, default_value = "none")]
        compare: CompareMode,
        /// Reference date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Every analytics view at once
    Summary {
        /// Client id or name
        client: String,
        /// Reference date for the trend (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend treasury products
    Recommend {
        /// Client id or name
        client: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prepare a report payload for download
    Export {
        /// Client id or name
        client: String,
        /// json, csv, pdf or excel
        #[arg(long, default_value = "json")]
        format: String,
        /// Directory to write into (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reference date for the trend (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Print the payload instead of writing a file
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}

/// 2 for a bad client, filter or option; 1 for everything else
fn exit_code(err: &anyhow::Error) -> u8 {
    let caller_error = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<treasury_core::Error>())
        .any(|e| e.is_client_error());
    if caller_error {
        2
    } else {
        1
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Clients { json } => clients::run(json),
        Commands::Accounts { client, json } => accounts::run(&client, json).await,
        Commands::Demo { command } => demo::run(command),
        Commands::Overview { client, filter, json } => overview::run(&client, filter, json).await,
        Commands::CashFlow { client, filter, period, json } => {
            cash_flow::run(&client, filter, period, json).await
        }
        Commands::Categories { client, filter, json } => {
            categories::run(&client, filter, json).await
        }
        Commands::Vendors { client, filter, json } => vendors::run(&client, filter, json).await,
        Commands::Liquidity { client, json } => liquidity::run(&client, json).await,
        Commands::Patterns { client, json } => patterns::run(&client, json).await,
        Commands::Trends { client, metric, lookback, as_of, json } => {
            trends::run(&client, metric, lookback, as_of, json).await
        }
        Commands::Forecast { client, days, confidence, json } => {
            forecast::run(&client, days, confidence, json).await
        }
        Commands::Benchmark { client, json } => benchmark::run(&client, json).await,
        Commands::Dashboard { client, range, compare, as_of, json } => {
            dashboard::run(&client, range, compare, as_of, json).await
        }
        Commands::Summary { client, as_of, json } => summary::run(&client, as_of, json).await,
        Commands::Recommend { client, json } => recommend::run(&client, json).await,
        Commands::Export { client, format, output, as_of, json } => {
            export::run(&client, &format, output, as_of, json).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_typed_arguments() {
        let cli = Cli::try_parse_from([
            "tms", "trends", "Northwind", "--metric", "outflow", "--lookback", "6m",
        ])
        .unwrap();
        match cli.command {
            Commands::Trends { metric, lookback, .. } => {
                assert_eq!(metric, TrendMetric::Outflow);
                assert_eq!(lookback, Lookback::months(6));
            }
            _ => panic!("expected trends"),
        }

        assert!(Cli::try_parse_from(["tms", "trends", "x", "--metric", "profit"]).is_err());
        assert!(Cli::try_parse_from(["tms", "dashboard", "x", "--range", "2w"]).is_err());
    }

    #[test]
    fn test_exit_code_separates_caller_errors() {
        use anyhow::Context;

        let not_found = anyhow::Error::from(treasury_core::Error::not_found("client"));
        assert_eq!(exit_code(&not_found), 2);

        let wrapped: Result<()> =
            Err(treasury_core::Error::bad_request("days")).context("Forecast failed");
        assert_eq!(exit_code(&wrapped.unwrap_err()), 2);

        let database = anyhow::Error::from(treasury_core::Error::database("locked"));
        assert_eq!(exit_code(&database), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), 1);
    }

    #[test]
    fn test_filter_flags_accept_negative_amounts() {
        let cli = Cli::try_parse_from([
            "tms", "overview", "x", "--type", "ach,check", "--min-amount", "-500",
        ])
        .unwrap();
        match cli.command {
            Commands::Overview { filter, .. } => {
                assert_eq!(filter.types.len(), 2);
                assert!(filter.min_amount.is_some_and(|m| m.is_sign_negative()));
            }
            _ => panic!("expected overview"),
        }
    }
}
