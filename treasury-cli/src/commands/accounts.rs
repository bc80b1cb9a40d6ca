//! Accounts command - list a client's accounts and their ids

use anyhow::Result;

use super::{get_context, resolve_client};
use crate::output;

pub async fn run(client: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let accounts = ctx.analytics_service.accounts(client_id).await?;

    if json {
        return output::json(&accounts);
    }

    if accounts.is_empty() {
        output::warning("No accounts found");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Type", "Bank", "Currency"]);
    for account in &accounts {
        table.add_row(vec![
            account.id.to_string(),
            account.name.clone(),
            account.account_type.clone().unwrap_or_else(|| "-".to_string()),
            account.bank_name.clone().unwrap_or_else(|| "-".to_string()),
            account.currency.clone(),
        ]);
    }
    println!("{}", table);
    output::info("Pass an ID to --account to restrict the analytics commands.");
    Ok(())
}
