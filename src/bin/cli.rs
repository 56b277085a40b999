//! jobsweep CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobsweep::{
    error::Result,
    fetch::create_fetcher,
    models::{Config, Pagination},
    pipeline::Scraper,
    storage::{JobStorage, JobsFile, LocalStorage},
};

/// jobsweep - entry-level job listing scraper
#[derive(Parser, Debug)]
#[command(
    name = "jobsweep",
    version,
    about = "Extracts 0-2 years experience job listings from job boards"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "jobsweep.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one board
    Scrape {
        /// Board name (indeed, naukri, or a configured adapter)
        #[arg(short, long)]
        board: String,

        /// Search URL (default: the board's default URL)
        #[arg(short, long, default_value = "")]
        url: String,

        /// Write results as JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List configured boards
    Boards,

    /// Validate configuration and adapters
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Scrape { board, url, output } => {
            let adapter = config.adapter(&board)?;
            let scraper = Scraper::new(&adapter, config.limits)?;
            let fetcher = create_fetcher(&config.fetcher, &adapter)?;

            let report = scraper.run(fetcher, &url).await;
            log::info!(
                "{}: {} jobs from {} page(s), stopped: {}",
                adapter.name,
                report.jobs.len(),
                report.pages_fetched,
                report.stop
            );

            let file = JobsFile::new(adapter.name.clone(), report.jobs);
            match output {
                Some(path) => {
                    LocalStorage::new(".")
                        .write_jobs(&path.to_string_lossy(), &file)
                        .await?;
                }
                None => println!("{}", serde_json::to_string_pretty(&file)?),
            }
        }

        Command::Boards => {
            for adapter in config.all_adapters() {
                let strategy = match &adapter.pagination {
                    Pagination::Offset { param, .. } => format!("offset ({param})"),
                    other => other.name().to_string(),
                };
                println!("{:<12} {:<12} {}", adapter.name, strategy, adapter.default_url);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} boards)", config.all_adapters().len());
        }
    }

    Ok(())
}
