//! Cash-flow command - bucketed inflow and outflow

use anyhow::Result;
use comfy_table::Cell;
use treasury_core::analytics::{CashFlowAnalysis, Period};

use super::{get_context, resolve_client, FilterArgs};
use crate::output;

pub async fn run(client: &str, filter: FilterArgs, period: Period, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;
    let filter = filter.into_filter()?;

    let analysis = ctx
        .analytics_service
        .cash_flow(client_id, &filter, period)
        .await?;

    if json {
        return output::json(&analysis);
    }

    output::header(&format!("Cash Flow ({})", period));
    print_buckets(&analysis);
    Ok(())
}

pub fn print_buckets(analysis: &CashFlowAnalysis) {
    if analysis.buckets.is_empty() {
        output::warning("No transactions in range");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["Period", "Inflow", "Outflow", "Net", "Balance", "Count"]);
    for bucket in &analysis.buckets {
        table.add_row(vec![
            Cell::new(&bucket.period_key),
            output::number_cell(output::money(bucket.inflow)),
            output::number_cell(output::money(bucket.outflow)),
            output::number_cell(output::money(bucket.net_flow)),
            output::number_cell(output::money(bucket.balance)),
            output::number_cell(bucket.transaction_count.to_string()),
        ]);
    }
    println!("{}", table);
    println!(
        "Total: {} in, {} out, net {}",
        output::money(analysis.total_inflow),
        output::money(analysis.total_outflow),
        output::money(analysis.net_cash_flow)
    );
}
