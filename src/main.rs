use clap::{Parser, Subcommand};
use log::{error, info, warn};
use poker_tally::config::Config;
use poker_tally::db::FlagStore;
use poker_tally::issue::{IssueClient, push_estimate};
use poker_tally::panel::{FileSnapshotProvider, SnapshotProvider, VotePanel};
use poker_tally::table::SortableTable;
use poker_tally::tasks::panel_watcher::PanelWatcher;
use poker_tally::{AppError, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

#[derive(Parser)]
#[command(name = "poker-tally", version, about = "Planning poker vote counter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tally a vote panel snapshot once and print the panel title
    Tally { snapshot: PathBuf },
    /// Re-tally a vote panel snapshot whenever it changes
    Watch {
        snapshot: PathBuf,
        /// Seconds between checks; overrides WATCH_INTERVAL_SECONDS
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Write the agreed estimate into an issue field
    Push { issue_key: String, snapshot: PathBuf },
    /// Sort a table by column and print it as JSON
    Sort {
        table: PathBuf,
        column: usize,
        /// Number of consecutive sorts, as if the header were clicked repeatedly
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Tally { snapshot } => {
            // Read the snapshot once and render the panel title
            let entries = FileSnapshotProvider::new(snapshot).snapshot().await?;
            let view = VotePanel::new(&config.panel_title).render(&entries);
            println!("{}", view.title);
            match view.estimate {
                Some(estimate) => println!("Estimate: {}", estimate),
                None => println!("Estimate: unresolved"),
            }
            Ok(())
        }
        Command::Watch { snapshot, interval } => {
            // Re-tally on every change until the panel goes missing for good
            let provider: Arc<dyn SnapshotProvider> = Arc::new(FileSnapshotProvider::new(snapshot));
            let watcher = PanelWatcher::new(
                provider,
                VotePanel::new(&config.panel_title),
                config.discovery_retries,
            );
            let seconds = interval.unwrap_or(config.watch_interval_seconds).max(1);
            watcher.run(StdDuration::from_secs(seconds)).await
        }
        Command::Push { issue_key, snapshot } => {
            let issue_config = config.issue.clone().ok_or_else(|| {
                AppError::Config("ISSUE_BASE_URL and ISSUE_API_TOKEN are required to push".to_string())
            })?;

            // Only a single numeric estimate is worth pushing
            let entries = FileSnapshotProvider::new(snapshot).snapshot().await?;
            let view = VotePanel::new(&config.panel_title).render(&entries);
            let Some(estimate) = view.estimate else {
                warn!("No single numeric estimate to push: {}", view.title);
                return Ok(());
            };

            // Open the flag store and report the previous push, if any
            let flags = FlagStore::connect(&config.database_url).await?;
            if let Some(at) = flags.get_timestamp(&poker_tally::db::last_push_key(&issue_key)).await? {
                info!("Estimate for {} was last pushed at {}", issue_key, at.to_rfc3339());
            }

            // Fire once; failures are logged inside push_estimate
            let client = IssueClient::new(issue_config);
            push_estimate(&client, &flags, &issue_key, estimate).await;
            Ok(())
        }
        Command::Sort { table, column, times } => {
            // Each pass flips the column direction, like a header click
            let raw = tokio::fs::read_to_string(&table).await?;
            let mut table = SortableTable::from_json(&raw)?;
            for _ in 0..times {
                table.sort_by_column(column)?;
            }
            println!("{}", serde_json::to_string_pretty(&table)?);
            Ok(())
        }
    }
}
