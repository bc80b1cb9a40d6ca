//! Liquidity command - balance health over recent activity

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use treasury_core::analytics::LiquiditySnapshot;

use super::{get_context, resolve_client};
use crate::output;

pub async fn run(client: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let snapshot = ctx.analytics_service.liquidity(client_id).await?;

    if json {
        return output::json(&snapshot);
    }

    output::header("Liquidity");
    print_liquidity(&snapshot);
    Ok(())
}

pub fn print_liquidity(snapshot: &LiquiditySnapshot) {
    let score = format!("{}/10", snapshot.liquidity_score);
    let score = match snapshot.liquidity_score {
        7..=10 => score.green(),
        4..=6 => score.yellow(),
        _ => score.red(),
    };

    let mut table = output::create_table();
    table.add_row(vec![Cell::new("Liquidity score"), Cell::new(score)]);
    let rows = [
        ("Average balance", output::money(snapshot.average_balance)),
        ("Minimum balance", output::money(snapshot.minimum_balance)),
        ("Maximum balance", output::money(snapshot.maximum_balance)),
        ("Volatility", format!("{:.3}", snapshot.volatility)),
        ("Idle days", snapshot.idle_days.to_string()),
        ("Transactions analyzed", snapshot.transactions_analyzed.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), output::number_cell(value)]);
    }
    println!("{}", table);

    if snapshot.threshold_exceeded {
        output::warning(&format!(
            "Balance dropped below {}",
            output::money(snapshot.threshold_amount)
        ));
    }
}
