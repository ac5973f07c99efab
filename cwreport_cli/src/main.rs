mod commands;
mod logging;
mod ui;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use cwreport_config::DEFAULT_CONFIG_PATH;
use cwreport_core::Category;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cwreport")]
#[command(about = "Aggregate CloudWatch metrics per resource into a tabular report", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect metrics for every resource of a category and write the report
    Run {
        /// The resource category to pull metrics for
        #[arg(value_parser = PossibleValuesParser::new(Category::names()))]
        category: String,

        /// The region to pull metrics from, the default is ap-southeast-1
        #[arg(short, long)]
        region: Option<String>,

        /// The credential profile to use if not using default credentials
        #[arg(short, long)]
        profile: Option<String>,

        /// Path to the metrics configuration (YAML, TOML, or JSON)
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Backend serving resources and metrics (aws, fixture)
        #[arg(short, long, default_value = "aws")]
        backend: String,

        /// Recorded responses for the fixture backend
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format (csv, json, markdown)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Print the report as a table once collected
        #[arg(long)]
        preview: bool,
    },

    /// Validate a metrics configuration file
    Validate {
        /// Path to the metrics configuration
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// List supported categories and backends
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            category,
            region,
            profile,
            config,
            backend,
            fixture,
            output_dir,
            format,
            preview,
        } => {
            commands::run::execute(commands::run::RunArgs {
                category,
                region,
                profile,
                config,
                backend,
                fixture,
                output_dir,
                format,
                preview,
                quiet: cli.quiet,
            })
            .await?;
        }

        Commands::Validate { config } => {
            commands::validate::execute(config).await?;
        }

        Commands::List => {
            commands::list::execute().await?;
        }
    }

    Ok(())
}
