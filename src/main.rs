use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rink_monitor::{
    api::ForecastClient,
    config::AppConfig,
    monitor::ConditionMonitor,
    traits::{LogNotifier, Notifier, SystemClock, WebhookNotifier},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "rink-monitor")]
#[command(about = "Outdoor rink freeze-readiness monitor")]
struct Args {
    /// Run a single check cycle and exit instead of scheduling
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("rink_monitor=debug");

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(run(config, args))
}

async fn run(config: AppConfig, args: Args) -> Result<()> {
    tracing::info!("Starting Rink Monitor");

    // One shared client for every cycle; only this function owns it,
    // and it is released after the loop stops scheduling cycles.
    let client = ForecastClient::new(&config.network)?;
    tracing::info!("Forecast client initialized");

    let notifier: Arc<dyn Notifier> = match &config.notifications.webhook_url {
        Some(url) => {
            tracing::info!(url = %url, "Delivering events to webhook");
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => Arc::new(LogNotifier),
    };

    let monitor_config = config.monitor_config();
    tracing::info!(
        latitude = monitor_config.coordinates.latitude,
        longitude = monitor_config.coordinates.longitude,
        freeze_threshold_f = monitor_config.freeze_threshold_f,
        required_hours = monitor_config.required_hours,
        "Monitor configured"
    );

    let monitor = ConditionMonitor::new(client, monitor_config, Arc::new(SystemClock), notifier);

    if args.once {
        monitor.run_cycle().await;
        return Ok(());
    }

    let interval_secs = config.schedule.check_interval_secs;
    tracing::info!("Starting check loop with interval: {} seconds", interval_secs);

    monitor
        .run_scheduled(Duration::from_secs(interval_secs), async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    // The monitor (and its client) is released only after the loop has
    // stopped scheduling cycles.
    Ok(())
}
