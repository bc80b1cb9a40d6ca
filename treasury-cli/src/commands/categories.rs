//! Categories command - spend by category with period-over-period trend

use anyhow::Result;
use comfy_table::Cell;
use treasury_core::analytics::CategoryBreakdown;

use super::{get_context, resolve_client, FilterArgs};
use crate::output;

pub async fn run(client: &str, filter: FilterArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;
    let filter = filter.into_filter()?;

    let breakdown = ctx.analytics_service.categories(client_id, &filter).await?;

    if json {
        return output::json(&breakdown);
    }

    output::header("Categories");
    print_categories(&breakdown);
    if breakdown.comparison_period.is_none() {
        output::info("Pass --from and --to to compare against the preceding period");
    }
    Ok(())
}

pub fn print_categories(breakdown: &CategoryBreakdown) {
    if breakdown.categories.is_empty() {
        output::warning("No transactions in range");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["Category", "Amount", "Count", "Share", "Trend"]);
    for stat in &breakdown.categories {
        table.add_row(vec![
            Cell::new(&stat.category),
            output::number_cell(output::money(stat.amount)),
            output::number_cell(stat.count.to_string()),
            output::number_cell(output::percent(stat.percentage)),
            Cell::new(output::trend(stat.trend.as_str())),
        ]);
    }
    println!("{}", table);
}
