use crate::report::Report;
use csv_async::{AsyncWriterBuilder, QuoteStyle, Terminator};
use cwreport_core::{ReportError, Result};
use std::path::Path;
use tokio::io::AsyncWrite;

pub struct CsvExporter;

fn csv_error(e: csv_async::Error) -> ReportError {
    ReportError::Other(e.into())
}

impl CsvExporter {
    pub async fn export(report: &Report, path: impl AsRef<Path>) -> Result<()> {
        let file = tokio::fs::File::create(path).await?;
        Self::write_to(report, file).await
    }

    /// Title line, header line, then one record per row, CRLF terminated.
    /// Records have different lengths, so the writer is flexible.
    pub async fn write_to<W>(report: &Report, writer: W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut csv = AsyncWriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .flexible(true)
            .create_writer(writer);

        csv.write_record(&[report.title.as_str()])
            .await
            .map_err(csv_error)?;
        csv.write_record(&report.header).await.map_err(csv_error)?;
        for row in &report.rows {
            csv.write_record(row.to_strings()).await.map_err(csv_error)?;
        }
        csv.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Cell, ReportRow};
    use chrono::Utc;
    use cwreport_core::Category;

    #[tokio::test]
    async fn test_csv_layout() {
        let mut report = Report::new(
            Category::Lambda,
            "Average metrics for the past 1 hour(s) with 300 second(s) interval".into(),
            vec![
                "Resource Identifier".into(),
                "Invocations (Count)".into(),
                "Errors (Count)".into(),
            ],
            Utc::now(),
        );
        report
            .push_row(ReportRow {
                cells: vec![Cell::from("R1"), Cell::Number(15.0), Cell::Number(0.0)],
            })
            .unwrap();
        report
            .push_row(ReportRow {
                cells: vec![Cell::from("needs, quoting"), Cell::Number(1.25), Cell::Number(3.0)],
            })
            .unwrap();

        let mut buf: Vec<u8> = Vec::new();
        CsvExporter::write_to(&report, &mut buf).await.unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Average metrics for the past 1 hour(s) with 300 second(s) interval\r\n\
             Resource Identifier,Invocations (Count),Errors (Count)\r\n\
             R1,15.0,0.0\r\n\
             \"needs, quoting\",1.25,3.0\r\n"
        );
    }
}
