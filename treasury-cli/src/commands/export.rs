//! Export command - write the report payload for download

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use treasury_core::analytics::ExportFormat;

use super::{as_of_or_today, get_context, resolve_client};
use crate::output;

pub async fn run(
    client: &str,
    format: &str,
    output_dir: Option<PathBuf>,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let client_id = resolve_client(&ctx, client)?;

    let export = ctx
        .analytics_service
        .prepare_export(client_id, format, as_of_or_today(as_of))
        .await?;

    if json {
        return output::json(&export);
    }

    // Binary formats are rendered downstream; the payload is always JSON
    let dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    let file_name = match export.format {
        ExportFormat::Json => export.file_name.clone(),
        _ => format!("{}.json", export.file_name),
    };
    let path = dir.join(file_name);
    let content = serde_json::to_string_pretty(&export)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output::success(&format!("Report payload written to {}", path.display()));
    Ok(())
}
