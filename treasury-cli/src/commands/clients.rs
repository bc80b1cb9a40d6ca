//! Clients command - list clients with their profile

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        return output::json(&status.clients);
    }

    if status.clients.is_empty() {
        output::warning("No clients found");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Industry", "Segment"]);
    for client in &status.clients {
        table.add_row(vec![
            client.id.as_str(),
            client.name.as_str(),
            client.industry.as_deref().unwrap_or("-"),
            client.business_segment.as_deref().unwrap_or("-"),
        ]);
    }
    println!("{}", table);
    Ok(())
}
