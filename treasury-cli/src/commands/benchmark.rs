//! Benchmark command - compare with the client's industry segment

use anyhow::Result;
use comfy_table::Cell;

use super::{get_context, resolve_client};
use crate::output;

pub async fn run(client: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let report = ctx.analytics_service.benchmark(client_id).await?;

    if json {
        return output::json(&report);
    }

    output::header(&format!(
        "Benchmark: {} / {}",
        report.industry.as_deref().unwrap_or("unknown industry"),
        report.business_segment.as_deref().unwrap_or("unknown segment")
    ));
    if !report.matched_benchmark {
        output::warning("No benchmark for this segment; using the general benchmark");
    }

    let mut table = output::create_table();
    table.set_header(vec!["Metric", "Client", "Benchmark", "Score"]);
    for comparison in &report.comparisons {
        table.add_row(vec![
            Cell::new(&comparison.metric),
            output::number_cell(format!("{:.2}", comparison.client_value)),
            output::number_cell(format!("{:.2}", comparison.benchmark_value)),
            output::number_cell(format!("{:.0}", comparison.score)),
        ]);
    }
    println!("{}", table);
    println!("Percentile rank: {:.0}", report.percentile_rank);
    Ok(())
}
