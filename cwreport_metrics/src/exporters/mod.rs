pub mod csv;
pub mod json;
pub mod markdown;

pub use self::csv::CsvExporter;
pub use json::JsonExporter;
pub use markdown::MarkdownExporter;

use crate::report::{Report, ReportFormat};
use cwreport_core::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `report` into `dir` under its generated file name and returns the
/// path. Content goes to a `.partial` file first and is renamed into place
/// only once complete, so a failed write leaves no report behind.
pub async fn export_report(report: &Report, format: ReportFormat, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(report.file_name(format));
    let partial = path.with_extension(format!("{}.partial", format.extension()));

    let written = match format {
        ReportFormat::Csv => CsvExporter::export(report, &partial).await,
        ReportFormat::Json => JsonExporter::export(report, &partial).await,
        ReportFormat::Markdown => MarkdownExporter::export(report, &partial).await,
    };

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }

    tokio::fs::rename(&partial, &path).await?;
    info!("Wrote {} report to {}", format, path.display());
    Ok(path)
}
