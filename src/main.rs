use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use tariff_watcher::core::{JsonStateStore, StateStore};
use tariff_watcher::models::{CommodityKind, StateFile};
use tariff_watcher::plugins::notifiers::TelegramNotifier;
use tariff_watcher::plugins::trackers::TariffExtractor;
use tariff_watcher::scraper::HttpFetcher;
use tariff_watcher::{AppConfig, TariffMonitor};

#[derive(Debug, Parser)]
#[command(
    name = "tariff-watcher",
    version,
    about = "Alert once when an energy tariff drops below your target"
)]
struct Cli {
    /// TOML file with the same keys as the environment variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides STATE_FILE
    #[arg(long)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one monitoring pass (default)
    Check,
    /// Extract a price from a saved page without alerting
    Extract {
        kind: CommodityKind,
        file: PathBuf,
    },
    /// Print the persisted state
    State,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tariff_watcher=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Check) {
        Command::Extract { kind, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let extractor = TariffExtractor::new()?;
            match extractor.extract_detailed(&text, kind) {
                Some(found) => println!(
                    "{} {} ({:?}, pattern {})",
                    found.price,
                    kind.unit(),
                    found.confidence,
                    found.pattern
                ),
                None => println!("no {} price found", kind),
            }
        }
        command => {
            let mut config = AppConfig::from_env(cli.config.as_deref())?;
            if let Some(path) = cli.state_file {
                config.state.path = path;
            }
            let store = JsonStateStore::new(config.state.path.clone());

            if let Command::State = command {
                println!("{}", serde_json::to_string_pretty(&StateFile::from(&store.load()?))?);
                return Ok(());
            }

            info!("Starting tariff check...");
            let fetcher = HttpFetcher::new(&config.scraper)?;
            let notifier = TelegramNotifier::new(&config.telegram, config.request_timeout())?;
            let monitor = TariffMonitor::new(config, Box::new(fetcher), Box::new(notifier))?;

            let report = monitor.run(&store).await?;
            info!(
                "Check complete: {} notification(s) sent, state saved to {}",
                report.notifications_sent(),
                store.path().display()
            );
        }
    }

    Ok(())
}
