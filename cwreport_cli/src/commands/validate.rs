use crate::ui;
use anyhow::Result;
use cwreport_config::{load_config_from_file, ReportConfig};
use std::path::PathBuf;

/// Per-category lines printed under a valid configuration.
fn describe_categories(config: &ReportConfig) -> cwreport_core::Result<Vec<String>> {
    let mut lines = Vec::new();
    for category in config.categories() {
        let metrics = config.metrics_for(category)?;
        lines.push(format!("\n  {} ({} metrics)", category, metrics.len()));
        for metric in metrics {
            lines.push(format!(
                "    {} [{}] {} by {}",
                metric.header(),
                metric.namespace,
                config.statistic_for(metric),
                metric.dimension_name
            ));
        }
        lines.push(format!(
            "    columns: {}",
            config.csv_header_for(category)?.len()
        ));
    }
    Ok(lines)
}

pub async fn execute(config_file: PathBuf) -> Result<()> {
    ui::print_header("=== Validating Configuration ===");
    println!("File: {}", config_file.display());

    let checked = load_config_from_file(&config_file)
        .await
        .and_then(|config| describe_categories(&config).map(|lines| (config, lines)));

    match checked {
        Ok((config, lines)) => {
            ui::print_success("Configuration is valid!");
            println!("\nAggregation: {}", config.aggregation().describe());
            println!("Title: {}", config.aggregation().title());
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        Err(e) => {
            ui::print_error("Configuration is invalid!");
            println!("\nError: {}", e);
            Err(e.into())
        }
    }
}
