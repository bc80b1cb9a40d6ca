//! Overview command - inflow, outflow and balance headline numbers

use anyhow::Result;
use comfy_table::Cell;
use treasury_core::analytics::Overview;

use super::{get_context, resolve_client, FilterArgs};
use crate::output;

pub async fn run(client: &str, filter: FilterArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;
    let filter = filter.into_filter()?;

    let overview = ctx.analytics_service.overview(client_id, &filter).await?;

    if json {
        return output::json(&overview);
    }

    output::header("Cash Overview");
    print_overview(&overview);
    Ok(())
}

/// Two-column table shared with the summary command
pub fn print_overview(overview: &Overview) {
    let mut table = output::create_table();
    let rows = [
        ("Total inflow", output::money(overview.total_inflow)),
        ("Total outflow", output::money(overview.total_outflow)),
        ("Net cash flow", output::money(overview.net_cash_flow)),
        ("Transactions", overview.transaction_count.to_string()),
        ("Average daily balance", output::money(overview.average_daily_balance)),
        ("Liquidity ratio", format!("{:.2}", overview.liquidity_ratio)),
        ("Idle balance", output::money(overview.idle_balance)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), output::number_cell(value)]);
    }
    println!("{}", table);

    if let (Some(start), Some(end)) = (overview.period.start_date, overview.period.end_date) {
        println!("Period: {} to {}", start, end);
    }
}
