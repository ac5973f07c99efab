use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No metrics configured for category '{category}'")]
    MissingMetrics { category: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid row layout: {0}")]
    InvalidLayout(String),

    #[error("Backend request failed: {0}")]
    Transport(String),

    #[error("Datapoint for metric '{metric}' has no '{statistic}' value")]
    MissingStatistic { metric: String, statistic: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// True for errors raised before any backend call was made.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            ReportError::Config(_)
                | ReportError::MissingMetrics { .. }
                | ReportError::UnknownCategory(_)
                | ReportError::InvalidLayout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_fatal_config() {
        assert!(ReportError::Config("bad".into()).is_fatal_config());
        assert!(ReportError::MissingMetrics {
            category: "ec2".into()
        }
        .is_fatal_config());
        assert!(!ReportError::Transport("timeout".into()).is_fatal_config());
    }

    #[test]
    fn test_error_messages() {
        let err = ReportError::MissingStatistic {
            metric: "CPUUtilization".into(),
            statistic: "Average".into(),
        };
        assert_eq!(
            err.to_string(),
            "Datapoint for metric 'CPUUtilization' has no 'Average' value"
        );
    }
}
