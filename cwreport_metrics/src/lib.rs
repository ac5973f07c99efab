pub mod aggregator;
pub mod collector;
pub mod engine;
pub mod exporters;
pub mod layout;
pub mod report;

pub use aggregator::SampleAggregator;
pub use collector::{DatapointSeries, MetricsCollector, PARENT_DIMENSION};
pub use engine::{Progress, ReportEngine};
pub use exporters::{export_report, CsvExporter, JsonExporter, MarkdownExporter};
pub use layout::{Cell, ReportRow, RowLayout};
pub use report::{Report, ReportFormat};
