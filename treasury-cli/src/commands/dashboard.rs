//! Dashboard command - KPIs for a relative range with optional comparison

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use treasury_core::analytics::{CompareMode, DashboardOptions, DateRangeToken};

use super::{as_of_or_today, get_context, resolve_client};
use super::{cash_flow::print_buckets, categories::print_categories};
use crate::output;

pub async fn run(
    client: &str,
    range: DateRangeToken,
    compare: CompareMode,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let options = DashboardOptions {
        date_range: range,
        compare_mode: compare,
        as_of: as_of_or_today(as_of),
    };
    let dashboard = ctx.analytics_service.dashboard(client_id, options).await?;

    if json {
        return output::json(&dashboard);
    }

    let (start, end) = (dashboard.period.start_date, dashboard.period.end_date);
    output::header(&format!(
        "Dashboard ({}): {} to {}",
        range.as_str(),
        start.map(|d| d.to_string()).unwrap_or_default(),
        end.map(|d| d.to_string()).unwrap_or_default()
    ));

    let mut table = output::create_table();
    table.set_header(vec!["KPI", "Value", "Previous", "Change", "Trend"]);
    for kpi in &dashboard.kpis {
        let previous = kpi
            .comparison_value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&kpi.label),
            output::number_cell(format!("{:.2}", kpi.value)),
            output::number_cell(previous),
            Cell::new(output::change(kpi.change_percent)),
            Cell::new(output::trend(kpi.trend.as_str())),
        ]);
    }
    println!("{}", table);
    println!();

    println!("Cash flow");
    print_buckets(&dashboard.cash_flow);
    println!();
    println!("Categories");
    print_categories(&dashboard.categories);
    Ok(())
}
