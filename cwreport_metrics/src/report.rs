use crate::layout::ReportRow;
use chrono::{DateTime, Local, Utc};
use cwreport_core::{Category, ReportError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A fully assembled report: descriptive title, column headers and one row
/// per resource.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub category: Category,
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(category: Category, title: String, header: Vec<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            category,
            title,
            header,
            rows: Vec::new(),
            generated_at,
        }
    }

    /// Appends a row, refusing rows whose width differs from the header.
    pub fn push_row(&mut self, row: ReportRow) -> Result<()> {
        if row.len() != self.header.len() {
            return Err(ReportError::InvalidLayout(format!(
                "row has {} columns but the {} header has {}",
                row.len(),
                self.category,
                self.header.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// `{category}-{Mon-DD-HH-MM-SS}.{ext}` in local time.
    pub fn file_name(&self, format: ReportFormat) -> String {
        format!(
            "{}{}.{}",
            self.category,
            self.generated_at
                .with_timezone(&Local)
                .format("-%b-%d-%H-%M-%S"),
            format.extension()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(ReportError::Config(format!("Unknown format: {}", s))),
        }
    }
}
