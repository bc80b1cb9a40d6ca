//! Vendors command - top counterparties by spend

use anyhow::Result;
use comfy_table::Cell;

use super::{get_context, resolve_client, FilterArgs};
use crate::output;

pub async fn run(client: &str, filter: FilterArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;
    let filter = filter.into_filter()?;

    let analysis = ctx.analytics_service.vendors(client_id, &filter).await?;

    if json {
        return output::json(&analysis);
    }

    output::header("Vendors");
    if analysis.vendors.is_empty() {
        output::warning("No vendor payments in range");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Vendor", "Spend", "Payments", "Share", "Methods"]);
    for vendor in &analysis.vendors {
        let methods: Vec<&str> = vendor.payment_methods.iter().map(|m| m.as_str()).collect();
        table.add_row(vec![
            Cell::new(&vendor.vendor_name),
            output::number_cell(output::money(vendor.total_amount)),
            output::number_cell(vendor.transaction_count.to_string()),
            output::number_cell(output::percent(vendor.percentage)),
            Cell::new(methods.join(", ")),
        ]);
    }
    println!("{}", table);
    println!(
        "{} vendors, {} total spend",
        analysis.vendor_count,
        output::money(analysis.total_vendor_spend)
    );
    Ok(())
}
