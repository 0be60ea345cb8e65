//! Exchange Engine Binary
//!
//! Starts the LeadSwap exchange engine: wires the in-memory adapters,
//! the buffered event pipeline, and the periodic expiry sweep.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin exchange-engine
//! ```
//!
//! # Environment Variables
//!
//! - `EXCHANGE_CONFIG`: Config file path (default: config.yaml, optional)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;

use exchange_engine::application::services::{ExpirySweeper, ExpirySweeperConfig};
use exchange_engine::config::{Config, load_config};
use exchange_engine::domain::exchange::services::FairnessEvaluator;
use exchange_engine::infrastructure::messaging::{BufferedEventPublisher, run_event_logger};
use exchange_engine::infrastructure::persistence::{
    InMemoryApplicationRepository, InMemoryLeadStore,
};
use exchange_engine::ExchangeEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting LeadSwap Exchange Engine");

    let config = resolve_config()?;
    tracing::info!(
        expiry_hours = config.exchange.expiry_hours,
        sweep_interval_secs = config.sweep.interval_secs,
        queue_capacity = config.events.queue_capacity,
        "Configuration loaded"
    );

    let leads = Arc::new(InMemoryLeadStore::new());
    let applications = Arc::new(InMemoryApplicationRepository::new());
    let (publisher, event_rx) = BufferedEventPublisher::new(config.events.queue_capacity);

    let fairness = FairnessEvaluator::with_tolerance(
        config.valuation.to_table(),
        config.exchange.fairness_tolerance_decimal(),
    );

    let engine = Arc::new(ExchangeEngine::with_expiry_ttl(
        leads,
        applications,
        Arc::new(publisher),
        fairness,
        chrono::Duration::hours(config.exchange.expiry_hours),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let event_worker = tokio::spawn(run_event_logger(event_rx));

    let sweeper = ExpirySweeper::new(
        Arc::clone(&engine),
        ExpirySweeperConfig {
            enabled: config.sweep.enabled,
            interval_secs: config.sweep.interval_secs,
        },
    );
    let sweep_worker = tokio::spawn(sweeper.run(shutdown_rx));

    tracing::info!("Exchange engine running, press Ctrl+C to stop");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    shutdown_tx.send(true).ok();
    sweep_worker.await.context("sweep worker panicked")?;
    drop(engine);
    event_worker.await.context("event worker panicked")?;

    tracing::info!("Exchange engine stopped");
    Ok(())
}

/// Load the config file when present, fall back to defaults otherwise.
fn resolve_config() -> anyhow::Result<Config> {
    let path = std::env::var("EXCHANGE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    if std::path::Path::new(&path).exists() {
        load_config(Some(&path)).with_context(|| format!("loading config from {path}"))
    } else {
        tracing::info!(path, "No config file found, using defaults");
        Ok(Config::default())
    }
}

#[allow(clippy::expect_used)] // Static directives are compile-time constants
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "exchange_engine=info"
                    .parse()
                    .expect("static directive 'exchange_engine=info' is valid"),
            ),
        )
        .init();
}

#[allow(clippy::expect_used)] // Signal handler installation failure is unrecoverable
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
