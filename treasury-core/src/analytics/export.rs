//! Report export preparation
//!
//! Only the JSON form is produced here. Rendering the other formats happens
//! downstream from the same payload.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(Error::bad_request(format!(
                "Invalid export format '{}': expected json, csv, pdf or excel",
                other
            ))),
        }
    }
}

/// A prepared report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport<T> {
    pub format: ExportFormat,
    pub file_name: String,
    pub generated_at: DateTime<Utc>,
    pub summary: T,
}

impl<T> ReportExport<T> {
    pub fn new(client_id: Uuid, format: ExportFormat, summary: T) -> Self {
        let generated_at = Utc::now();
        let file_name = format!(
            "treasury-report-{}-{}.{}",
            client_id.simple(),
            generated_at.format("%Y%m%d%H%M%S"),
            format.extension()
        );
        Self {
            format,
            file_name,
            generated_at,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!(matches!("docx".parse::<ExportFormat>(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_file_name_uses_extension() {
        let export = ReportExport::new(Uuid::nil(), ExportFormat::Excel, ());
        assert!(export.file_name.starts_with("treasury-report-00000000000000000000000000000000-"));
        assert!(export.file_name.ends_with(".xlsx"));
    }
}
