use crate::config::{ConfigDocument, ReportConfig};
use cwreport_core::{ReportError, Result};
use std::path::Path;
use tracing::debug;

/// Default location of the metrics configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "metrics.yaml";

pub async fn load_config_from_file(path: impl AsRef<Path>) -> Result<ReportConfig> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        ReportError::Config(format!("cannot read '{}': {}", path.display(), e))
    })?;

    let extension = path.extension().and_then(|s| s.to_str());
    debug!("Loading configuration from {}", path.display());

    match extension {
        Some("yaml") | Some("yml") => parse_yaml(&contents),
        Some("toml") => parse_toml(&contents),
        Some("json") => parse_json(&contents),
        _ => Err(ReportError::Config(
            "Unsupported file format. Use .yaml, .yml, .toml, or .json".to_string(),
        )),
    }
}

pub fn load_config_from_str(content: &str, format: &str) -> Result<ReportConfig> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => parse_yaml(content),
        "toml" => parse_toml(content),
        "json" => parse_json(content),
        _ => Err(ReportError::Config(format!("Unsupported format: {}", format))),
    }
}

fn parse_yaml(content: &str) -> Result<ReportConfig> {
    let document: ConfigDocument =
        serde_yaml::from_str(content).map_err(|e| ReportError::Config(e.to_string()))?;
    ReportConfig::from_document(document)
}

fn parse_toml(content: &str) -> Result<ReportConfig> {
    let document: ConfigDocument =
        toml::from_str(content).map_err(|e| ReportError::Config(e.to_string()))?;
    ReportConfig::from_document(document)
}

fn parse_json(content: &str) -> Result<ReportConfig> {
    let document: ConfigDocument =
        serde_json::from_str(content).map_err(|e| ReportError::Config(e.to_string()))?;
    ReportConfig::from_document(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwreport_core::{Category, Statistic};

    const YAML: &str = r#"
hours: 24
period: 300
statistics: "Average"
metrics_to_be_collected:
  ec2:
    - name: "CPUUtilization"
      namespace: "AWS/EC2"
      unit: "Percent"
      dimension_name: "InstanceId"
    - name: "NetworkIn"
      namespace: "AWS/EC2"
      unit: "Bytes"
      dimension_name: "InstanceId"
      statistics: "Sum"
  s3:
    - name: "BucketSizeBytes"
      namespace: "AWS/S3"
      unit: "Bytes"
      dimension_name: "BucketName"
"#;

    #[test]
    fn test_parse_yaml() {
        let config = parse_yaml(YAML).unwrap();
        assert_eq!(config.aggregation().window_hours, 24);
        assert_eq!(config.aggregation().period_seconds, 300);
        assert_eq!(config.aggregation().default_statistic, Statistic::Average);

        let metrics = config.metrics_for(Category::Ec2).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[1].statistics, Some(Statistic::Sum));

        // unsupported categories are dropped
        assert_eq!(config.categories().collect::<Vec<_>>(), vec![Category::Ec2]);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
hours = 1
period = 60
statistics = "Maximum"

[[metrics_to_be_collected.lambda]]
name = "Errors"
namespace = "AWS/Lambda"
unit = "Count"
dimension_name = "FunctionName"
"#;

        let config = parse_toml(toml).unwrap();
        assert_eq!(config.metrics_for(Category::Lambda).unwrap()[0].name, "Errors");
    }

    #[test]
    fn test_parse_json() {
        let json = r#"
{
  "hours": 2,
  "period": 120,
  "statistics": "sum",
  "metrics_to_be_collected": {
    "tgw": [
      {"name": "BytesIn", "namespace": "AWS/TransitGateway", "unit": "Bytes", "dimension_name": "TransitGateway"}
    ]
  }
}
"#;

        let config = parse_json(json).unwrap();
        assert_eq!(config.aggregation().default_statistic, Statistic::Sum);
        assert!(config.metrics_for(Category::Tgw).is_ok());
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let err = parse_yaml("hours: 1\nstatistics: Average\n").unwrap_err();
        assert!(err.is_fatal_config());
    }

    #[test]
    fn test_unsupported_format() {
        assert!(load_config_from_str(YAML, "ini").is_err());
        assert!(load_config_from_str(YAML, "YAML").is_ok());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.yml");
        tokio::fs::write(&path, YAML).await.unwrap();

        let config = load_config_from_file(&path).await.unwrap();
        assert!(config.metrics_for(Category::Ec2).is_ok());

        let missing = load_config_from_file(dir.path().join("absent.yaml")).await;
        assert!(matches!(missing, Err(ReportError::Config(_))));
    }
}
