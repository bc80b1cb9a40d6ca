//! Patterns command - spending habits per category

use anyhow::Result;
use comfy_table::Cell;
use treasury_core::analytics::SpendingPattern;

use super::{get_context, resolve_client};
use crate::output;

pub async fn run(client: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let patterns = ctx.analytics_service.spending_patterns(client_id).await?;

    if json {
        return output::json(&patterns);
    }

    output::header("Spending Patterns");
    print_patterns(&patterns);
    Ok(())
}

pub fn print_patterns(patterns: &[SpendingPattern]) {
    if patterns.is_empty() {
        output::warning("No outflows recorded");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["Category", "Total", "Count", "Average", "Frequency", "Top vendors"]);
    for pattern in patterns {
        let vendors: Vec<&str> = pattern
            .top_vendors
            .iter()
            .map(|v| v.vendor_name.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(&pattern.category),
            output::number_cell(output::money(pattern.total_amount)),
            output::number_cell(pattern.transaction_count.to_string()),
            output::number_cell(output::money(pattern.average_amount)),
            Cell::new(pattern.frequency.as_str()),
            Cell::new(if vendors.is_empty() { "-".to_string() } else { vendors.join(", ") }),
        ]);
    }
    println!("{}", table);
}
