use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod dashboard;
mod display;
mod format;
mod report;
mod run;

#[derive(Debug, Parser)]
#[command(name = "fecheck-cli")]
#[command(about = "Daily electronic-invoicing status check across parking venues")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect every venue and the CUFE dashboard, then print the report
    Run {
        /// Omit the CUFE section instead of rendering the dashboard
        #[arg(long, conflicts_with = "html_file")]
        skip_dashboard: bool,
        /// Restrict the run to these venue keys (repeatable)
        #[arg(long = "venue")]
        venues: Vec<String>,
        /// Read the dashboard from a saved HTML file instead of rendering it
        #[arg(long)]
        html_file: Option<PathBuf>,
    },
    /// Show per-venue detail: pending record, jobs and latest invoice
    Venues {
        #[arg(long = "venue")]
        venues: Vec<String>,
        /// Only list the catalogue; no portal is contacted
        #[arg(long)]
        list: bool,
    },
    /// Extract and print the CUFE dashboard snapshot
    Dashboard {
        #[arg(long)]
        html_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = fecheck_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(venues_path = %config.venues_path.display(), "configuration loaded");

    match cli.command {
        Commands::Run {
            skip_dashboard,
            venues,
            html_file,
        } => run::run_report(&config, &venues, skip_dashboard, html_file.as_deref()).await,
        Commands::Venues { venues, list } => {
            if list {
                run::list_venues(&config)
            } else {
                run::show_venues(&config, &venues).await
            }
        }
        Commands::Dashboard { html_file } => {
            dashboard::run_dashboard(&config, html_file.as_deref()).await
        }
    }
}
