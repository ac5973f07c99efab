#[cfg(feature = "aws")]
pub mod aws;
pub mod fixture;

use crate::{
    category::Category,
    error::{ReportError, Result},
    query::{Datapoint, MetricQuery},
    resource::Resource,
};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub use fixture::FixtureBackend;

/// Lists the resources of a category, already filtered to the active state
/// where the category has one.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn list_resources(&self, category: Category) -> Result<Vec<Resource>>;
}

/// Answers one time-series query with the datapoints in the order the
/// backend returned them.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>>;
}

/// A monitoring backend able to both list resources and serve metrics.
pub trait Backend: ResourceLister + MetricSource {
    fn name(&self) -> &str;

    fn as_lister(&self) -> &dyn ResourceLister;

    fn as_source(&self) -> &dyn MetricSource;
}

pub type DynBackend = Arc<dyn Backend>;

/// Default region when none is given on the command line.
pub const DEFAULT_REGION: &str = "ap-southeast-1";

#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub fixture: Option<PathBuf>,
}

impl BackendOptions {
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Recorded resources and datapoints loaded from a JSON file
    Fixture,
    /// Live AWS APIs
    Aws,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Fixture => "fixture",
            BackendKind::Aws => "aws",
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            BackendKind::Fixture => true,
            BackendKind::Aws => cfg!(feature = "aws"),
        }
    }

    pub fn all() -> [BackendKind; 2] {
        [BackendKind::Aws, BackendKind::Fixture]
    }

    pub async fn connect(&self, options: &BackendOptions) -> Result<DynBackend> {
        match self {
            BackendKind::Fixture => {
                let path = options.fixture.as_ref().ok_or_else(|| {
                    ReportError::Config("the fixture backend needs a fixture file".to_string())
                })?;
                Ok(Arc::new(FixtureBackend::from_file(path).await?))
            }
            #[cfg(feature = "aws")]
            BackendKind::Aws => Ok(Arc::new(aws::AwsBackend::connect(options).await)),
            #[cfg(not(feature = "aws"))]
            BackendKind::Aws => Err(ReportError::Config(
                "this build has no AWS support; rebuild with --features aws".to_string(),
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixture" => Ok(BackendKind::Fixture),
            "aws" => Ok(BackendKind::Aws),
            _ => Err(ReportError::Config(format!("unknown backend '{}'", s))),
        }
    }
}
