//! Stock watcher CLI
//!
//! Polls the configured listing pages and alerts on newly listed items.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use stockwatch::{
    error::Result,
    models::Config,
    pipeline::{ChangeDetector, Scheduler},
    storage::{CsvSnapshotStore, Snapshot},
};

/// stockwatch - new item alerts for product listing pages
#[derive(Parser, Debug)]
#[command(name = "stockwatch", version, about = "Product listing watcher")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "stockwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll all sources forever
    Run,

    /// Run a single detection cycle and exit
    Once {
        /// Print the cycle report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration
    Validate,

    /// Show the stored snapshot
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the config file, then apply environment overrides.
fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;
    config.apply_env()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.config)?;
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run => {
            config.validate()?;
            let detector = ChangeDetector::from_config(&config)?;
            let scheduler = Scheduler::from_config(&config.monitor);
            log::info!("Starting stock watcher...");
            scheduler.run_forever(&detector).await;
        }

        Command::Once { json } => {
            config.validate()?;
            let detector = ChangeDetector::from_config(&config)?;
            let report = detector.run_cycle().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for source in &report.sources {
                    log::info!(
                        "{}: {} items, {} new{}",
                        source.source,
                        source.item_count,
                        source.new_count,
                        if source.fetch_failed { " (fetch failed)" } else { "" }
                    );
                }
                log::info!(
                    "{} new items across {} sources",
                    report.new_items(),
                    report.sources.len()
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("Sources: {}", config.monitor.sources.len());
            log::info!("Poll interval: {}s", config.monitor.poll_interval_secs);
            log::info!(
                "Webhook: {}",
                if config.notify.webhook_url.is_some() {
                    "configured"
                } else {
                    "not set"
                }
            );
        }

        Command::Info => {
            let store = CsvSnapshotStore::new(&config.storage.state_file);
            log::info!("State file: {}", store.path().display());

            match store.load_records().await? {
                Some(records) => {
                    log::info!("{} rows stored", records.len());
                    let snapshot = Snapshot::from_records(&records);
                    for (source, ids) in snapshot.iter() {
                        let tracked = config.monitor.sources.iter().any(|s| s == source);
                        log::info!(
                            "{}: {} items{}",
                            source,
                            ids.len(),
                            if tracked { "" } else { " (no longer configured)" }
                        );
                    }
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    Ok(())
}
