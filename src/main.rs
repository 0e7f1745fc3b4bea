// src/main.rs

//! Firewatch CLI.
//!
//! Local execution entry point: run the poll loop, run a single cycle, or
//! inspect configuration and watermark state.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::watch;

use firewatch::config::Config;
use firewatch::error::Result;
use firewatch::pipeline::{Scheduler, run_cycle};
use firewatch::services::{DiscordWebhookSink, FeedFetcher};
use firewatch::storage::{LocalWatermarkStore, WatermarkStore};

/// firewatch - fire/rescue incident feed watcher
#[derive(Parser, Debug)]
#[command(
    name = "firewatch",
    version,
    about = "Watches a fire/rescue incident feed and forwards new records"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feed until interrupted
    Run,

    /// Run a single fetch → parse → diff → dispatch cycle and exit
    Once,

    /// Validate the configuration file
    Validate,

    /// Show the persisted watermark state
    Info,
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
        Command::Run => {
            config.validate()?;
            let fetcher = FeedFetcher::new(&config.feed)?;
            let sink = DiscordWebhookSink::new(&config.sink)?;
            let store = LocalWatermarkStore::new(&config.storage.watermark_path);

            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx.send(true);
                }
            });

            log::info!(
                "Watching feed every {}s (watermark at {})",
                config.poll.interval_secs,
                config.storage.watermark_path
            );
            Scheduler::new(&config, &fetcher, &store, &sink).run(rx).await;
            log::info!("Stopped.");
        }

        Command::Once => {
            config.validate()?;
            let fetcher = FeedFetcher::new(&config.feed)?;
            let sink = DiscordWebhookSink::new(&config.sink)?;
            let store = LocalWatermarkStore::new(&config.storage.watermark_path);

            let report = run_cycle(&config, &fetcher, &store, &sink).await?;
            log::info!(
                "Cycle report: {} rows ({} malformed), {} new, {} delivered{}",
                report.total_rows,
                report.malformed_rows,
                report.fresh,
                report.delivered,
                if report.baselined { ", baselined" } else { "" }
            );
        }

        Command::Validate => {
            config.validate()?;
            log::info!("Configuration OK");
        }

        Command::Info => {
            let store = LocalWatermarkStore::new(&config.storage.watermark_path);
            match store.load().await? {
                Some(watermark) => log::info!("Watermark: {}", watermark),
                None => log::info!("No watermark persisted yet (first run pending)"),
            }
        }
    }

    Ok(())
}
