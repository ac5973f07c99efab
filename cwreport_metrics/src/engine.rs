use crate::collector::MetricsCollector;
use crate::layout::RowLayout;
use crate::report::Report;
use chrono::{DateTime, Utc};
use cwreport_config::ReportConfig;
use cwreport_core::{Category, MetricSource, ResourceId, ResourceLister, Result};
use tracing::info;

/// Progress notifications emitted while a report is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Listed { total: usize },
    Collected { index: usize, total: usize, id: ResourceId },
}

/// Single-pass pipeline: list resources, collect each one's metrics, reduce
/// and assemble one row per resource.
pub struct ReportEngine<'a> {
    config: &'a ReportConfig,
    lister: &'a dyn ResourceLister,
    source: &'a dyn MetricSource,
}

impl<'a> ReportEngine<'a> {
    pub fn new(
        config: &'a ReportConfig,
        lister: &'a dyn ResourceLister,
        source: &'a dyn MetricSource,
    ) -> Self {
        Self {
            config,
            lister,
            source,
        }
    }

    pub async fn run(&self, category: Category) -> Result<Report> {
        self.run_at(category, Utc::now(), |_| {}).await
    }

    pub async fn run_with_progress<F>(&self, category: Category, on_progress: F) -> Result<Report>
    where
        F: FnMut(Progress),
    {
        self.run_at(category, Utc::now(), on_progress).await
    }

    /// Builds the report for the window ending at `now`. Any error aborts the
    /// run and no report is returned.
    pub async fn run_at<F>(&self, category: Category, now: DateTime<Utc>, mut on_progress: F) -> Result<Report>
    where
        F: FnMut(Progress),
    {
        // fail on configuration problems before touching the backend
        let header = self.config.csv_header_for(category)?;
        let layout = RowLayout::for_category(category);
        let collector = MetricsCollector::new(self.config, self.source);

        let resources = self.lister.list_resources(category).await?;
        info!("Found {} {} resources", resources.len(), category);
        on_progress(Progress::Listed {
            total: resources.len(),
        });

        let mut report = Report::new(category, self.config.aggregation().title(), header, now);
        let total = resources.len();

        for (index, resource) in resources.iter().enumerate() {
            let id = resource.id();
            info!("Collecting statistics for {}", id);

            let series = collector.collect(category, resource, now).await?;
            let row = layout.assemble_row(category, resource, &series, self.config)?;
            report.push_row(row)?;

            on_progress(Progress::Collected { index, total, id });
        }

        info!("Assembled {} rows for {}", report.rows.len(), category);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Cell;
    use cwreport_config::MetricSpec;
    use cwreport_core::{
        async_trait, Datapoint, Dimension, FixtureBackend, MetricQuery, ReportError, Resource,
        Statistic,
    };
    use mockall::mock;

    mock! {
        pub Lister {}

        #[async_trait]
        impl ResourceLister for Lister {
            async fn list_resources(&self, category: Category) -> Result<Vec<Resource>>;
        }
    }

    mock! {
        pub Source {}

        #[async_trait]
        impl MetricSource for Source {
            async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>>;
        }
    }

    fn lambda_config() -> ReportConfig {
        ReportConfig::builder()
            .statistic("Average")
            .metric(
                Category::Lambda,
                MetricSpec::new("Invocations", "AWS/Lambda", "Count", "FunctionName"),
            )
            .metric(
                Category::Lambda,
                MetricSpec::new("Errors", "AWS/Lambda", "Count", "FunctionName"),
            )
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_generic_end_to_end() {
        let config = lambda_config();

        let mut lister = MockLister::new();
        lister
            .expect_list_resources()
            .returning(|_| Ok(vec![Resource::named("R1")]));

        let mut source = MockSource::new();
        source.expect_get_metric_statistics().returning(|q| {
            if q.metric_name == "Invocations" {
                Ok(vec![
                    Datapoint::with_value(&Statistic::Average, 10.0),
                    Datapoint::with_value(&Statistic::Average, 20.0),
                ])
            } else {
                Ok(vec![])
            }
        });

        let engine = ReportEngine::new(&config, &lister, &source);
        let report = engine.run(Category::Lambda).await.unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(
            report.rows[0].cells,
            vec![Cell::from("R1"), Cell::Number(15.0), Cell::Number(0.0)]
        );
        assert_eq!(
            report.header,
            vec!["Resource Identifier", "Invocations (Count)", "Errors (Count)"]
        );
    }

    #[tokio::test]
    async fn test_identical_responses_give_identical_values() {
        let config = lambda_config();

        let mut lister = MockLister::new();
        lister
            .expect_list_resources()
            .returning(|_| Ok(vec![Resource::named("a"), Resource::named("b")]));

        let mut source = MockSource::new();
        source
            .expect_get_metric_statistics()
            .times(4)
            .returning(|_| Ok(vec![Datapoint::with_value(&Statistic::Average, 3.0)]));

        let engine = ReportEngine::new(&config, &lister, &source);
        let report = engine.run(Category::Lambda).await.unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].cells[1..], report.rows[1].cells[1..]);
        assert_ne!(report.rows[0].cells[0], report.rows[1].cells[0]);
    }

    #[tokio::test]
    async fn test_linked_resource_dimensions() {
        let config = ReportConfig::builder()
            .statistic("Sum")
            .metric(
                Category::TgwAttachment,
                MetricSpec::new("BytesIn", "AWS/TransitGateway", "Bytes", "TransitGatewayAttachment"),
            )
            .build()
            .unwrap();

        let backend = FixtureBackend::from_json(
            r#"{"resources": {"tgwattachment": [
                {"kind": "attachment", "attachment_id": "A1", "transit_gateway_id": "TGW1"}
            ]}}"#,
        )
        .unwrap();

        let engine = ReportEngine::new(&config, &backend, &backend);
        let report = engine.run(Category::TgwAttachment).await.unwrap();
        assert_eq!(report.rows[0].len(), report.header.len());

        let served = backend.served_queries().await;
        assert_eq!(served.len(), 1);
        assert_eq!(
            served[0].dimensions,
            vec![
                Dimension::new("TransitGatewayAttachment", "A1"),
                Dimension::new("TransitGateway", "TGW1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_metrics_fails_before_listing() {
        let config = lambda_config();
        let mut lister = MockLister::new();
        lister.expect_list_resources().times(0);
        let source = MockSource::new();

        let engine = ReportEngine::new(&config, &lister, &source);
        let err = engine.run(Category::Ec2).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingMetrics { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_aborts_run() {
        let config = lambda_config();

        let mut lister = MockLister::new();
        lister
            .expect_list_resources()
            .returning(|_| Ok(vec![Resource::named("a"), Resource::named("b")]));

        let mut source = MockSource::new();
        source
            .expect_get_metric_statistics()
            .times(1)
            .returning(|_| Err(ReportError::Transport("connection reset".into())));

        let engine = ReportEngine::new(&config, &lister, &source);
        assert!(engine.run(Category::Lambda).await.is_err());
    }

    #[tokio::test]
    async fn test_progress_events() {
        let config = lambda_config();

        let mut lister = MockLister::new();
        lister
            .expect_list_resources()
            .returning(|_| Ok(vec![Resource::named("a")]));
        let mut source = MockSource::new();
        source.expect_get_metric_statistics().returning(|_| Ok(vec![]));

        let engine = ReportEngine::new(&config, &lister, &source);
        let mut events = Vec::new();
        engine
            .run_at(Category::Lambda, Utc::now(), |p| events.push(p))
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![
                Progress::Listed { total: 1 },
                Progress::Collected {
                    index: 0,
                    total: 1,
                    id: Resource::named("a").id()
                },
            ]
        );
    }
}
