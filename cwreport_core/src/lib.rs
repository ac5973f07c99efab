pub mod backends;
pub mod category;
pub mod error;
pub mod query;
pub mod resource;
pub mod statistic;

pub use backends::{
    Backend, BackendKind, BackendOptions, DynBackend, FixtureBackend, MetricSource,
    ResourceLister, DEFAULT_REGION,
};
pub use category::{Category, LayoutKind};
pub use error::{ReportError, Result};
pub use query::{Datapoint, Dimension, MetricQuery};
pub use resource::{AttachmentDetails, InstanceDetails, Resource, ResourceId};
pub use statistic::Statistic;

// Re-export commonly used types
pub use async_trait::async_trait;
