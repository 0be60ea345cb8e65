//! Expiry Sweeper Service
//!
//! Periodic driver for the engine's expiry sweep. The engine exposes no
//! timer of its own; this service owns the tokio interval and stops on a
//! shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::application::engine::ExchangeEngine;
use crate::application::ports::{EventPublisherPort, LeadReadPort};
use crate::domain::exchange::repository::ApplicationRepository;

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone)]
pub struct ExpirySweeperConfig {
    /// Whether the sweeper runs at all.
    pub enabled: bool,
    /// Seconds between sweep runs.
    pub interval_secs: u64,
}

impl Default for ExpirySweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
        }
    }
}

/// Periodically expires stale pending applications.
pub struct ExpirySweeper<L, R, P>
where
    L: LeadReadPort,
    R: ApplicationRepository,
    P: EventPublisherPort,
{
    engine: Arc<ExchangeEngine<L, R, P>>,
    config: ExpirySweeperConfig,
}

impl<L, R, P> ExpirySweeper<L, R, P>
where
    L: LeadReadPort,
    R: ApplicationRepository,
    P: EventPublisherPort,
{
    /// Create a new sweeper over the given engine.
    pub fn new(engine: Arc<ExchangeEngine<L, R, P>>, config: ExpirySweeperConfig) -> Self {
        Self { engine, config }
    }

    /// Run the sweep loop until the shutdown signal fires.
    ///
    /// A failed run is logged and the loop keeps going; the next tick
    /// retries the same window.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            tracing::info!("Expiry sweeper disabled");
            return;
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.config.interval_secs,
            "Expiry sweeper started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.engine.process_expired_applications().await {
                        Ok(count) if count > 0 => {
                            tracing::info!(expired = count, "Expiry sweep run complete");
                        }
                        Ok(_) => {}
                        Err(error) => {
                            tracing::error!(%error, "Expiry sweep run failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("Expiry sweeper stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::ApplyRequest;
    use crate::domain::exchange::services::{FairnessEvaluator, ValuationTable};
    use crate::domain::exchange::value_objects::ExchangeStatus;
    use crate::domain::leads::{Lead, LeadRating};
    use crate::domain::shared::{Credits, LeadId, UserId};
    use crate::infrastructure::messaging::RecordingEventPublisher;
    use crate::infrastructure::persistence::{InMemoryApplicationRepository, InMemoryLeadStore};

    type TestEngine =
        ExchangeEngine<InMemoryLeadStore, InMemoryApplicationRepository, RecordingEventPublisher>;

    fn make_engine() -> (Arc<TestEngine>, Arc<InMemoryApplicationRepository>) {
        let leads = InMemoryLeadStore::new();
        leads.insert(Lead::new(
            LeadId::new("target"),
            UserId::new("owner"),
            Some(LeadRating::D),
        ));
        leads.insert(Lead::new(
            LeadId::new("offer"),
            UserId::new("applicant"),
            Some(LeadRating::D),
        ));

        let repo = Arc::new(InMemoryApplicationRepository::new());
        let engine = Arc::new(ExchangeEngine::new(
            Arc::new(leads),
            Arc::clone(&repo),
            Arc::new(RecordingEventPublisher::new()),
            FairnessEvaluator::new(ValuationTable::default()),
        ));
        (engine, repo)
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_expires_stale_applications() {
        let (engine, repo) = make_engine();

        let app = engine
            .apply(ApplyRequest {
                applicant_id: UserId::new("applicant"),
                target_lead_id: LeadId::new("target"),
                offered_lead_ids: vec![LeadId::new("offer")],
                additional_credits: Credits::ZERO,
                reason: "trade".to_string(),
            })
            .await
            .unwrap();
        repo.backdate_created_at(app.id(), chrono::Duration::hours(100));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = ExpirySweeper::new(
            Arc::clone(&engine),
            ExpirySweeperConfig {
                enabled: true,
                interval_secs: 1,
            },
        );
        let handle = tokio::spawn(sweeper.run(shutdown_rx));

        tokio::time::sleep(Duration::from_secs(2)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        let swept = engine.get_application(app.id()).await.unwrap();
        assert_eq!(swept.status(), ExchangeStatus::Expired);
    }

    #[tokio::test]
    async fn disabled_sweeper_returns_immediately() {
        let (engine, _) = make_engine();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let sweeper = ExpirySweeper::new(
            engine,
            ExpirySweeperConfig {
                enabled: false,
                interval_secs: 1,
            },
        );

        // Completes without the shutdown signal ever firing.
        sweeper.run(shutdown_rx).await;
    }
}
