use cwreport_core::{Category, ReportError, Result, Statistic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

/// Longest window accepted, matching the 15 months CloudWatch retains data.
pub const MAX_WINDOW_HOURS: u32 = 455 * 24;

/// One monitored quantity to fetch for a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSpec {
    pub name: String,
    pub namespace: String,
    pub unit: String,
    pub dimension_name: String,
    /// Overrides the global statistic for this metric only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistic>,
}

impl MetricSpec {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        unit: impl Into<String>,
        dimension_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            unit: unit.into(),
            dimension_name: dimension_name.into(),
            statistics: None,
        }
    }

    pub fn with_statistic(mut self, statistic: impl Into<Statistic>) -> Self {
        self.statistics = Some(statistic.into());
        self
    }

    /// Column header used for this metric, e.g. `CPUUtilization (Percent)`.
    pub fn header(&self) -> String {
        format!("{} ({})", self.name, self.unit)
    }
}

/// Time window and default reduction shared by every metric of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationConfig {
    pub window_hours: u32,
    pub period_seconds: u32,
    pub default_statistic: Statistic,
}

impl AggregationConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(u64::from(self.window_hours) * 3600)
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(u64::from(self.period_seconds))
    }

    /// Descriptive line written above the column headers.
    pub fn title(&self) -> String {
        format!(
            "{} metrics for the past {} hour(s) with {} second(s) interval",
            self.default_statistic, self.window_hours, self.period_seconds
        )
    }

    pub fn describe(&self) -> String {
        format!(
            "{} over the past {} at {} granularity",
            self.default_statistic,
            humantime::format_duration(self.window()),
            humantime::format_duration(self.period())
        )
    }
}

/// The document as written on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub hours: u32,
    pub period: u32,
    pub statistics: Statistic,
    #[serde(default)]
    pub metrics_to_be_collected: BTreeMap<String, Vec<MetricSpec>>,
    #[serde(default)]
    pub csv_headers: BTreeMap<String, Vec<String>>,
}

/// Validated, read-only settings for one run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    aggregation: AggregationConfig,
    metrics: BTreeMap<Category, Vec<MetricSpec>>,
    csv_headers: BTreeMap<Category, Vec<String>>,
}

impl ReportConfig {
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    pub fn from_document(document: ConfigDocument) -> Result<Self> {
        if document.hours == 0 {
            return Err(ReportError::Config("'hours' must be > 0".to_string()));
        }
        if document.hours > MAX_WINDOW_HOURS {
            return Err(ReportError::Config(format!(
                "'hours' must be at most {} (15 months), got {}",
                MAX_WINDOW_HOURS, document.hours
            )));
        }
        if document.period == 0 {
            return Err(ReportError::Config("'period' must be > 0".to_string()));
        }

        let mut metrics = BTreeMap::new();
        for (key, specs) in document.metrics_to_be_collected {
            let Ok(category) = key.parse::<Category>() else {
                warn!("Ignoring metrics for unsupported category '{}'", key);
                continue;
            };
            if specs.is_empty() {
                return Err(ReportError::MissingMetrics {
                    category: category.to_string(),
                });
            }
            for (i, spec) in specs.iter().enumerate() {
                validate_metric(category, i, spec)?;
            }
            metrics.insert(category, specs);
        }

        let mut csv_headers = BTreeMap::new();
        for (key, headers) in document.csv_headers {
            let category = key.parse::<Category>().map_err(|_| {
                ReportError::Config(format!("csv_headers given for unknown category '{}'", key))
            })?;
            csv_headers.insert(category, headers);
        }

        let config = Self {
            aggregation: AggregationConfig {
                window_hours: document.hours,
                period_seconds: document.period,
                default_statistic: document.statistics,
            },
            metrics,
            csv_headers,
        };
        config.validate_headers()?;
        Ok(config)
    }

    fn validate_headers(&self) -> Result<()> {
        for (category, headers) in &self.csv_headers {
            let layout = category.layout_kind();
            if !layout.is_bespoke() {
                return Err(ReportError::Config(format!(
                    "csv_headers are only supported for ec2 and tgwattachment, not '{}'",
                    category
                )));
            }
            let metric_count = self.metrics.get(category).map(Vec::len).unwrap_or(0);
            let expected = layout.identity_headers().len() + metric_count;
            if headers.len() != expected {
                return Err(ReportError::InvalidLayout(format!(
                    "csv_headers for '{}' has {} columns, expected {} ({} identity + {} metrics)",
                    category,
                    headers.len(),
                    expected,
                    layout.identity_headers().len(),
                    metric_count
                )));
            }
        }
        Ok(())
    }

    pub fn aggregation(&self) -> &AggregationConfig {
        &self.aggregation
    }

    /// Configured metrics for `category`, in declaration order.
    pub fn metrics_for(&self, category: Category) -> Result<&[MetricSpec]> {
        match self.metrics.get(&category) {
            Some(specs) if !specs.is_empty() => Ok(specs),
            _ => Err(ReportError::MissingMetrics {
                category: category.to_string(),
            }),
        }
    }

    /// Full column header line for `category`.
    pub fn csv_header_for(&self, category: Category) -> Result<Vec<String>> {
        let metrics = self.metrics_for(category)?;
        if let Some(headers) = self.csv_headers.get(&category) {
            return Ok(headers.clone());
        }
        let mut headers: Vec<String> = category
            .layout_kind()
            .identity_headers()
            .iter()
            .map(|h| h.to_string())
            .collect();
        headers.extend(metrics.iter().map(MetricSpec::header));
        Ok(headers)
    }

    /// The metric's own statistic if it has one, otherwise the global default.
    pub fn statistic_for<'a>(&'a self, metric: &'a MetricSpec) -> &'a Statistic {
        metric
            .statistics
            .as_ref()
            .unwrap_or(&self.aggregation.default_statistic)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.metrics.keys().copied()
    }
}

fn validate_metric(category: Category, index: usize, spec: &MetricSpec) -> Result<()> {
    let fields = [
        ("name", &spec.name),
        ("namespace", &spec.namespace),
        ("unit", &spec.unit),
        ("dimension_name", &spec.dimension_name),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(ReportError::Config(format!(
                "metric {} of '{}' has an empty '{}'",
                index, category, field
            )));
        }
    }
    Ok(())
}

pub struct ReportConfigBuilder {
    hours: u32,
    period: u32,
    statistic: Statistic,
    metrics: BTreeMap<String, Vec<MetricSpec>>,
    csv_headers: BTreeMap<String, Vec<String>>,
}

impl Default for ReportConfigBuilder {
    fn default() -> Self {
        Self {
            hours: 1,
            period: 300,
            statistic: Statistic::Average,
            metrics: BTreeMap::new(),
            csv_headers: BTreeMap::new(),
        }
    }
}

impl ReportConfigBuilder {
    pub fn hours(mut self, hours: u32) -> Self {
        self.hours = hours;
        self
    }

    pub fn period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    pub fn statistic(mut self, statistic: impl Into<Statistic>) -> Self {
        self.statistic = statistic.into();
        self
    }

    pub fn metric(mut self, category: Category, spec: MetricSpec) -> Self {
        self.metrics
            .entry(category.to_string())
            .or_default()
            .push(spec);
        self
    }

    pub fn csv_header(mut self, category: Category, headers: Vec<String>) -> Self {
        self.csv_headers.insert(category.to_string(), headers);
        self
    }

    pub fn build(self) -> Result<ReportConfig> {
        ReportConfig::from_document(ConfigDocument {
            hours: self.hours,
            period: self.period,
            statistics: self.statistic,
            metrics_to_be_collected: self.metrics,
            csv_headers: self.csv_headers,
        })
    }
}
