use crate::error::{ReportError, Result};
use crate::statistic::Statistic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single time-series request for one metric of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
    pub unit: String,
    pub statistic: Statistic,
    pub period_seconds: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One sample returned by the backend. `values` is keyed by statistic name
/// (`Average`, `Sum`, ...), matching the fields the backend fills in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Datapoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl Datapoint {
    pub fn with_value(statistic: &Statistic, value: f64) -> Self {
        let mut values = BTreeMap::new();
        values.insert(statistic.as_str().to_string(), value);
        Self {
            timestamp: None,
            values,
        }
    }

    pub fn value(&self, statistic: &Statistic) -> Option<f64> {
        self.values.get(statistic.as_str()).copied()
    }

    /// Like [`Datapoint::value`], but a missing field is an error.
    pub fn require(&self, metric: &str, statistic: &Statistic) -> Result<f64> {
        self.value(statistic)
            .ok_or_else(|| ReportError::MissingStatistic {
                metric: metric.to_string(),
                statistic: statistic.to_string(),
            })
    }
}
