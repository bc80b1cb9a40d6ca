//! Trends command - monthly series for one metric

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use treasury_core::analytics::{Lookback, TrendMetric, TrendSeries};

use super::{as_of_or_today, get_context, resolve_client};
use crate::output;

pub async fn run(
    client: &str,
    metric: TrendMetric,
    lookback: Lookback,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let series = ctx
        .analytics_service
        .trends(client_id, metric, lookback, as_of_or_today(as_of))
        .await?;

    if json {
        return output::json(&series);
    }

    output::header(&format!(
        "{} trend, {} to {}",
        series.metric, series.start_date, series.end_date
    ));
    print_series(&series);
    Ok(())
}

pub fn print_series(series: &TrendSeries) {
    if series.points.is_empty() {
        output::warning("No activity in the lookback window");
        return;
    }

    let as_count = series.metric == TrendMetric::Transactions;
    let mut table = output::create_table();
    table.set_header(vec!["Month", "Value", "Change", "Change %"]);
    for point in &series.points {
        let (value, change) = if as_count {
            (format!("{:.0}", point.value), format!("{:+.0}", point.change))
        } else {
            (output::money_f64(point.value), output::money_f64(point.change))
        };
        table.add_row(vec![
            Cell::new(&point.period),
            output::number_cell(value),
            output::number_cell(change),
            Cell::new(output::change(point.change_percent)),
        ]);
    }
    println!("{}", table);
}
