pub mod config;
pub mod parser;

pub use config::{
    AggregationConfig, ConfigDocument, MetricSpec, ReportConfig, ReportConfigBuilder, MAX_WINDOW_HOURS,
};
pub use parser::{load_config_from_file, load_config_from_str, DEFAULT_CONFIG_PATH};
