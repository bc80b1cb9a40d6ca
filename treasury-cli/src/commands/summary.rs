//! Summary command - every analytics view for a client at once

use anyhow::Result;
use chrono::NaiveDate;

use super::{as_of_or_today, get_context, resolve_client};
use super::{
    cash_flow::print_buckets, categories::print_categories, liquidity::print_liquidity,
    overview::print_overview, patterns::print_patterns, trends::print_series,
};
use crate::output;

pub async fn run(client: &str, as_of: Option<NaiveDate>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let summary = ctx
        .analytics_service
        .summary(client_id, as_of_or_today(as_of))
        .await?;

    if json {
        return output::json(&summary);
    }

    output::header(&format!("{} - analytics summary", summary.client.name));
    print_overview(&summary.overview);
    println!();
    println!("Monthly cash flow");
    print_buckets(&summary.cash_flow);
    println!();
    println!("Categories");
    print_categories(&summary.categories);
    println!();
    println!("Liquidity");
    print_liquidity(&summary.liquidity);
    println!();
    println!("Spending patterns");
    print_patterns(&summary.patterns);
    println!();
    println!("Inflow trend ({})", summary.inflow_trend.lookback);
    print_series(&summary.inflow_trend);
    Ok(())
}
