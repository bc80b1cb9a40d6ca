//! Forecast command - projected daily flows and balance

use anyhow::Result;
use comfy_table::Cell;
use treasury_core::analytics::ForecastOptions;

use super::{get_context, resolve_client};
use crate::output;

pub async fn run(client: &str, days: u32, confidence: f64, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let forecast = ctx
        .analytics_service
        .forecast(client_id, ForecastOptions { days, confidence })
        .await?;

    if json {
        return output::json(&forecast);
    }

    output::header(&format!("Cash Forecast ({} days)", days));
    if !forecast.sufficient_history {
        output::warning(&format!(
            "Not enough history to forecast: {} days of activity, {} required",
            forecast.history_days,
            ctx.config.analytics.forecast.min_history_days
        ));
        return Ok(());
    }

    println!(
        "Average daily inflow {} (trend {:+.2}/day), outflow {} (trend {:+.2}/day)",
        output::money_f64(forecast.average_daily_inflow),
        forecast.inflow_trend,
        output::money_f64(forecast.average_daily_outflow),
        forecast.outflow_trend
    );
    println!("Starting balance {}", output::money_f64(forecast.starting_balance));
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Inflow", "Outflow", "Balance", "Confidence"]);
    for point in &forecast.points {
        table.add_row(vec![
            Cell::new(point.date),
            output::number_cell(output::money_f64(point.predicted_inflow)),
            output::number_cell(output::money_f64(point.predicted_outflow)),
            output::number_cell(output::money_f64(point.predicted_balance)),
            output::number_cell(output::percent(point.confidence * 100.0)),
        ]);
    }
    println!("{}", table);
    Ok(())
}
