use crate::report::Report;
use cwreport_core::Result;
use std::path::Path;

pub struct JsonExporter;

impl JsonExporter {
    pub async fn export(report: &Report, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn to_string(report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
