//! Giveaway Watcher CLI
//!
//! Checks the giveaways listing once, notifies the webhook about new
//! postings and exits. Meant to be triggered periodically (cron, systemd
//! timer, ...).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use giveaway_watcher::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::{GiveawayScraper, Notifier, WebhookNotifier},
    storage::{LocalSnapshotStore, SnapshotStore},
    utils::http,
};

/// Giveaway Watcher - new giveaway notifications for Discord
#[derive(Parser, Debug)]
#[command(name = "giveaway-watcher", version, about = "Giveaway listing watcher")]
struct Cli {
    /// Path to the config file (default: config.json next to the executable)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the snapshot file (overrides paths.snapshot_file)
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check for new giveaways and notify the webhook (default)
    Run,

    /// Validate the configuration file
    Validate,

    /// Show the stored snapshot
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Stdout)
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return Err(e);
        }
    };
    log::debug!("Loaded configuration from {}", config_path.display());

    if let Some(path) = cli.snapshot {
        config.paths.snapshot_file = path;
    }

    let store = LocalSnapshotStore::new(&config.paths.snapshot_file);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let client = http::create_async_client(&config.http)?;
            let notifier = WebhookNotifier::new(&config, client.clone());

            // Failures past this point are reported to the webhook, not returned.
            let source = match GiveawayScraper::new(&config.source, client) {
                Ok(source) => source,
                Err(e) => {
                    report_setup_failure(&notifier, &e).await;
                    return Ok(());
                }
            };

            if let Some(report) = pipeline::run_with_reporting(&source, &store, &notifier).await
            {
                log::info!(
                    "Done: {} listed, {} new, {} notified, {} skipped",
                    report.fetched,
                    report.added.len(),
                    report.notified,
                    report.skipped
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", config_path.display());
        }

        Command::Info => {
            log::info!("Snapshot: {}", store.path().display());

            let postings = store.load().await?;
            if postings.is_empty() {
                log::info!("No snapshot found yet.");
            } else {
                log::info!("{} giveaways stored:", postings.len());
                for posting in &postings {
                    log::info!(" - {}", posting.title);
                }
            }
        }
    }

    Ok(())
}

/// Report a failure that happened before the pipeline could start.
async fn report_setup_failure(notifier: &WebhookNotifier, error: &AppError) {
    let message = format!("An error occurred: {error}");
    log::error!("{}", message);
    notifier.notify(&message, None).await;
}
