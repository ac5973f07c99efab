use crate::ui;
use anyhow::Result;
use colored::Colorize;
use cwreport_config::{load_config_from_file, AggregationConfig};
use cwreport_core::{BackendKind, BackendOptions, Category, ReportError, DEFAULT_REGION};
use cwreport_metrics::{export_report, MarkdownExporter, Progress, ReportEngine, ReportFormat};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

pub struct RunArgs {
    pub category: String,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub config: PathBuf,
    pub backend: String,
    pub fixture: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub format: String,
    pub preview: bool,
    pub quiet: bool,
}

/// Lines printed before collection starts, describing window and session.
fn announcement(
    category: Category,
    aggregation: &AggregationConfig,
    region: Option<&str>,
    profile: Option<&str>,
) -> Vec<String> {
    let fetching = format!(
        "Fetching {} metrics for the past {} hour(s) with {} second(s) period....",
        category, aggregation.window_hours, aggregation.period_seconds
    );
    let session = match (region, profile) {
        (None, None) => format!(
            "No region and credential profile passed, using default region \"{}\" and using default configured credentials",
            DEFAULT_REGION
        ),
        (Some(region), None) => format!(
            "Region argument passed. Using region \"{}\" and using the default credentials",
            region
        ),
        (None, Some(profile)) => format!(
            "Credential profile passed. Using default region {} and using profile \"{}\"",
            DEFAULT_REGION, profile
        ),
        (Some(region), Some(profile)) => format!(
            "Credential profile and region passed. Using region \"{}\" and using profile \"{}\"",
            region, profile
        ),
    };
    vec![fetching, session]
}

/// Operator-facing summary of why a run stopped.
fn failure_headline(err: &ReportError) -> &'static str {
    if err.is_fatal_config() {
        "Configuration error, nothing was collected"
    } else {
        "Report aborted, no report file was written"
    }
}

fn report_failure(err: ReportError) -> anyhow::Error {
    ui::print_error(failure_headline(&err));
    err.into()
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let category = args.category.parse::<Category>().map_err(report_failure)?;
    let format = args.format.parse::<ReportFormat>().map_err(report_failure)?;
    let backend_kind = args.backend.parse::<BackendKind>().map_err(report_failure)?;

    ui::print_header("=== CloudWatch Metrics Report ===");

    let config = load_config_from_file(&args.config)
        .await
        .map_err(report_failure)?;
    // fail fast when the category has nothing configured
    config.metrics_for(category).map_err(report_failure)?;

    for line in announcement(
        category,
        config.aggregation(),
        args.region.as_deref(),
        args.profile.as_deref(),
    ) {
        println!("{}", line);
    }

    let options = BackendOptions {
        region: args.region.clone(),
        profile: args.profile.clone(),
        fixture: args.fixture.clone(),
    };
    let backend = backend_kind
        .connect(&options)
        .await
        .map_err(report_failure)?;
    info!("Connected to {} backend", backend.name());

    let pb = ProgressBar::new(0);
    if args.quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")?
            .progress_chars("=>-"),
    );

    let started = Instant::now();
    let engine = ReportEngine::new(&config, backend.as_lister(), backend.as_source());
    let report = engine
        .run_with_progress(category, |progress| match progress {
            Progress::Listed { total } => {
                pb.set_length(total as u64);
                pb.println(format!("Finished searching for the {} resources", category));
            }
            Progress::Collected { id, .. } => {
                pb.set_message(id.to_string());
                pb.inc(1);
            }
        })
        .await;
    pb.finish_and_clear();
    let report = report.map_err(report_failure)?;

    if report.rows.is_empty() {
        ui::print_warning(&format!("No {} resources found", category));
    }

    if args.preview {
        println!("\n{}", report.title.bold());
        println!("{}", MarkdownExporter::table(&report));
    }

    let path = export_report(&report, format, &args.output_dir)
        .await
        .map_err(report_failure)?;
    let elapsed = Duration::from_millis(started.elapsed().as_millis() as u64);

    ui::print_info(&format!(
        "{} resources, {}",
        report.rows.len(),
        config.aggregation().describe()
    ));
    ui::print_info(&format!("Elapsed: {}", humantime::format_duration(elapsed)));
    ui::print_success(&format!(
        "{} file {} created.",
        format.to_string().to_uppercase(),
        path.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwreport_core::Statistic;

    fn aggregation() -> AggregationConfig {
        AggregationConfig {
            window_hours: 24,
            period_seconds: 300,
            default_statistic: Statistic::Average,
        }
    }

    #[test]
    fn test_announcement_defaults() {
        let lines = announcement(Category::Lambda, &aggregation(), None, None);
        assert_eq!(
            lines[0],
            "Fetching lambda metrics for the past 24 hour(s) with 300 second(s) period...."
        );
        assert!(lines[1].contains("ap-southeast-1"));
    }

    #[test]
    fn test_failure_headline_separates_config_from_transport() {
        let config = ReportError::MissingMetrics {
            category: "ec2".into(),
        };
        assert_eq!(
            failure_headline(&config),
            "Configuration error, nothing was collected"
        );

        let transport = ReportError::Transport("throttled".into());
        assert_eq!(
            failure_headline(&transport),
            "Report aborted, no report file was written"
        );
    }

    #[test]
    fn test_announcement_region_and_profile() {
        let lines = announcement(
            Category::Ec2,
            &aggregation(),
            Some("eu-west-1"),
            Some("audit"),
        );
        assert!(lines[1].contains("\"eu-west-1\""));
        assert!(lines[1].contains("\"audit\""));
    }
}
