use chrono::{DateTime, Duration, Utc};
use cwreport_config::{MetricSpec, ReportConfig};
use cwreport_core::{
    Category, Dimension, MetricQuery, MetricSource, ReportError, Resource, ResourceId, Result,
};
use tracing::debug;

/// Dimension name carrying the parent gateway of a linked resource.
pub const PARENT_DIMENSION: &str = "TransitGateway";

/// Raw samples per configured metric for one resource, in configured order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatapointSeries {
    entries: Vec<(String, Vec<f64>)>,
}

impl DatapointSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records samples for `metric`. An empty sample list is stored as a
    /// single zero so reductions always have input.
    pub fn insert(&mut self, metric: impl Into<String>, mut samples: Vec<f64>) {
        if samples.is_empty() {
            samples.push(0.0);
        }
        self.entries.push((metric.into(), samples));
    }

    pub fn get(&self, metric: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, samples)| samples.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Issues one query per configured metric for a resource and gathers the
/// returned samples.
pub struct MetricsCollector<'a> {
    config: &'a ReportConfig,
    source: &'a dyn MetricSource,
}

impl<'a> MetricsCollector<'a> {
    pub fn new(config: &'a ReportConfig, source: &'a dyn MetricSource) -> Self {
        Self { config, source }
    }

    pub fn build_dimensions(metric: &MetricSpec, id: &ResourceId) -> Vec<Dimension> {
        match id {
            ResourceId::Single(value) => vec![Dimension::new(&metric.dimension_name, value)],
            ResourceId::Linked { primary, parent } => vec![
                Dimension::new(&metric.dimension_name, primary),
                Dimension::new(PARENT_DIMENSION, parent),
            ],
        }
    }

    /// Query for the window `[now - hours, now]`. A window reaching outside
    /// the representable time range is a configuration error.
    pub fn build_query(
        &self,
        metric: &MetricSpec,
        id: &ResourceId,
        now: DateTime<Utc>,
    ) -> Result<MetricQuery> {
        let aggregation = self.config.aggregation();
        let start = Duration::try_hours(i64::from(aggregation.window_hours))
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "a {} hour window ending at {} is out of range",
                    aggregation.window_hours, now
                ))
            })?;

        Ok(MetricQuery {
            namespace: metric.namespace.clone(),
            metric_name: metric.name.clone(),
            dimensions: Self::build_dimensions(metric, id),
            unit: metric.unit.clone(),
            statistic: self.config.statistic_for(metric).clone(),
            period_seconds: aggregation.period_seconds,
            start,
            end: now,
        })
    }

    /// Fetches every configured metric of `category` for `resource`, one
    /// request at a time. Backend errors are returned as-is.
    pub async fn collect(
        &self,
        category: Category,
        resource: &Resource,
        now: DateTime<Utc>,
    ) -> Result<DatapointSeries> {
        let id = resource.id();
        let mut series = DatapointSeries::new();

        for metric in self.config.metrics_for(category)? {
            let query = self.build_query(metric, &id, now)?;
            let datapoints = self.source.get_metric_statistics(&query).await?;

            debug!(
                "{} {} returned {} datapoints",
                id,
                metric.name,
                datapoints.len()
            );

            let samples = datapoints
                .iter()
                .map(|dp| dp.require(&metric.name, &query.statistic))
                .collect::<Result<Vec<f64>>>()?;
            series.insert(&metric.name, samples);
        }

        Ok(series)
    }
}
