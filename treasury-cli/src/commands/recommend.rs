//! Recommend command - treasury product suggestions

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use treasury_core::analytics::Priority;

use super::{get_context, resolve_client};
use crate::output;

pub async fn run(client: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let report = ctx.recommendation_service.recommend(client_id).await?;

    if json {
        return output::json(&report);
    }

    output::header(&format!("Recommendations for {}", report.client_name));
    if report.recommendations.is_empty() {
        output::info("No products to recommend right now");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Product", "Score", "Priority", "Annual benefit", "Rationale"]);
    for rec in &report.recommendations {
        let priority = match rec.priority {
            Priority::High => rec.priority.as_str().red().bold(),
            Priority::Medium => rec.priority.as_str().yellow(),
            Priority::Low => rec.priority.as_str().normal(),
        };
        table.add_row(vec![
            Cell::new(&rec.product_name),
            output::number_cell(format!("{:.0}", rec.score)),
            Cell::new(priority),
            output::number_cell(
                rec.estimated_annual_benefit
                    .map(output::money)
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(&rec.rationale),
        ]);
    }
    println!("{}", table);
    Ok(())
}
