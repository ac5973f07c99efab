use crate::{
    backends::{Backend, MetricSource, ResourceLister},
    category::Category,
    error::Result,
    query::{Datapoint, Dimension, MetricQuery},
    resource::Resource,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

/// Recorded response for one metric of one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSeries {
    pub metric: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub datapoints: Vec<Datapoint>,
}

impl RecordedSeries {
    fn matches(&self, query: &MetricQuery) -> bool {
        if self.metric != query.metric_name {
            return false;
        }
        if let Some(namespace) = &self.namespace {
            if namespace != &query.namespace {
                return false;
            }
        }
        let mut recorded = self.dimensions.clone();
        let mut requested = query.dimensions.clone();
        recorded.sort_by(|a, b| a.name.cmp(&b.name));
        requested.sort_by(|a, b| a.name.cmp(&b.name));
        recorded == requested
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub resources: BTreeMap<Category, Vec<Resource>>,
    #[serde(default)]
    pub series: Vec<RecordedSeries>,
}

/// Backend that replays recorded listings and datapoints. Queries with no
/// recorded series answer with zero datapoints. Every query served is kept so
/// callers can inspect what was requested.
pub struct FixtureBackend {
    data: FixtureData,
    served: RwLock<Vec<MetricQuery>>,
}

impl FixtureBackend {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            served: RwLock::new(Vec::new()),
        }
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let data: FixtureData = serde_json::from_str(contents)?;
        Ok(Self::new(data))
    }

    pub async fn served_queries(&self) -> Vec<MetricQuery> {
        self.served.read().await.clone()
    }
}

#[async_trait]
impl ResourceLister for FixtureBackend {
    async fn list_resources(&self, category: Category) -> Result<Vec<Resource>> {
        Ok(self
            .data
            .resources
            .get(&category)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl MetricSource for FixtureBackend {
    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>> {
        self.served.write().await.push(query.clone());

        let datapoints = self
            .data
            .series
            .iter()
            .find(|series| series.matches(query))
            .map(|series| series.datapoints.clone())
            .unwrap_or_default();

        debug!(
            "Fixture answered {} with {} datapoints",
            query.metric_name,
            datapoints.len()
        );
        Ok(datapoints)
    }
}

impl Backend for FixtureBackend {
    fn name(&self) -> &str {
        "fixture"
    }

    fn as_lister(&self) -> &dyn ResourceLister {
        self
    }

    fn as_source(&self) -> &dyn MetricSource {
        self
    }
}
