use crate::report::Report;
use cwreport_core::Result;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

pub struct MarkdownExporter;

impl MarkdownExporter {
    pub async fn export(report: &Report, path: impl AsRef<Path>) -> Result<()> {
        let markdown = Self::format(report);
        tokio::fs::write(path, markdown).await?;
        Ok(())
    }

    pub fn table(report: &Report) -> String {
        let mut builder = Builder::default();
        builder.push_record(report.header.iter().cloned());
        for row in &report.rows {
            builder.push_record(row.to_strings());
        }
        let mut table = builder.build();
        table.with(Style::markdown());
        table.to_string()
    }

    pub fn format(report: &Report) -> String {
        format!(
            r#"# {} Metrics Report

{}

Generated at {}

{}

Resources: {}
"#,
            report.category,
            report.title,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            Self::table(report),
            report.rows.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Cell, ReportRow};
    use chrono::Utc;
    use cwreport_core::Category;

    #[test]
    fn test_markdown_table() {
        let mut report = Report::new(
            Category::Rds,
            "Maximum metrics".into(),
            vec!["Resource Identifier".into(), "CPUUtilization (Percent)".into()],
            Utc::now(),
        );
        report
            .push_row(ReportRow {
                cells: vec![Cell::from("db-1"), Cell::Number(87.5)],
            })
            .unwrap();

        let markdown = MarkdownExporter::format(&report);
        assert!(markdown.starts_with("# rds Metrics Report"));
        assert!(markdown.contains("| Resource Identifier | CPUUtilization (Percent) |"));
        assert!(markdown.contains("| db-1"));
        assert!(markdown.contains("87.5"));
        assert!(markdown.contains("Resources: 1"));
    }
}
