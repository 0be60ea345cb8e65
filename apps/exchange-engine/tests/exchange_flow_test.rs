//! Exchange Flow Integration Tests
//!
//! End-to-end scenarios driving the engine through the full lifecycle:
//! submission, review, cancellation, settlement, expiry sweep, and the
//! buffered event pipeline.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use exchange_engine::application::dto::ApplyRequest;
use exchange_engine::application::services::{ExpirySweeper, ExpirySweeperConfig};
use exchange_engine::domain::exchange::services::{FairnessEvaluator, ValuationTable};
use exchange_engine::domain::exchange::{ExchangeError, ExchangeEventType, ExchangeStatus};
use exchange_engine::domain::leads::{Lead, LeadRating};
use exchange_engine::domain::shared::{Credits, LeadId, PageRequest, UserId};
use exchange_engine::infrastructure::messaging::{BufferedEventPublisher, RecordingEventPublisher};
use exchange_engine::infrastructure::persistence::{
    InMemoryApplicationRepository, InMemoryLeadStore,
};
use exchange_engine::ExchangeEngine;
use rust_decimal_macros::dec;
use tokio::sync::watch;

const APPLICANT: &str = "broker-li";
const OWNER: &str = "broker-zhang";

fn seeded_leads() -> Arc<InMemoryLeadStore> {
    let store = InMemoryLeadStore::new();
    store.insert(Lead::new(
        LeadId::new("target-a"),
        UserId::new(OWNER),
        Some(LeadRating::A),
    ));
    store.insert(Lead::new(
        LeadId::new("offer-b1"),
        UserId::new(APPLICANT),
        Some(LeadRating::B),
    ));
    store.insert(Lead::new(
        LeadId::new("offer-b2"),
        UserId::new(APPLICANT),
        Some(LeadRating::B),
    ));
    store.insert(Lead::new(
        LeadId::new("offer-d"),
        UserId::new(APPLICANT),
        Some(LeadRating::D),
    ));
    Arc::new(store)
}

fn fair_request() -> ApplyRequest {
    ApplyRequest {
        applicant_id: UserId::new(APPLICANT),
        target_lead_id: LeadId::new("target-a"),
        offered_lead_ids: vec![LeadId::new("offer-b1"), LeadId::new("offer-b2")],
        additional_credits: Credits::ZERO,
        reason: "expanding the downtown portfolio".to_string(),
    }
}

type TestEngine =
    ExchangeEngine<InMemoryLeadStore, InMemoryApplicationRepository, RecordingEventPublisher>;

fn make_engine() -> (
    Arc<TestEngine>,
    Arc<InMemoryApplicationRepository>,
    Arc<RecordingEventPublisher>,
) {
    let repo = Arc::new(InMemoryApplicationRepository::new());
    let publisher = Arc::new(RecordingEventPublisher::new());
    let engine = Arc::new(ExchangeEngine::new(
        seeded_leads(),
        Arc::clone(&repo),
        Arc::clone(&publisher),
        FairnessEvaluator::new(ValuationTable::default()),
    ));
    (engine, repo, publisher)
}

#[tokio::test]
async fn full_approval_flow() {
    let (engine, _, publisher) = make_engine();

    // Two B leads (4 + 4) exactly cover an A target (8).
    let app = engine.apply(fair_request()).await.unwrap();
    assert_eq!(app.status(), ExchangeStatus::Pending);
    assert!(app.reviewed_at().is_none());

    let approved = engine
        .approve_exchange(app.id(), &UserId::new(OWNER), "happy to trade")
        .await
        .unwrap();
    assert_eq!(approved.status(), ExchangeStatus::Approved);
    assert!(approved.reviewed_at().is_some());

    let completed = engine.complete_exchange(app.id(), None).await.unwrap();
    assert_eq!(completed.status(), ExchangeStatus::Completed);
    assert!(completed.completed_at().is_some());

    let events: Vec<_> = publisher
        .recorded()
        .iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        events,
        vec![
            ExchangeEventType::ApplicationSubmitted,
            ExchangeEventType::ApplicationApproved,
            ExchangeEventType::ExchangeCompleted,
        ]
    );
}

#[tokio::test]
async fn insufficient_offer_is_rejected_before_persistence() {
    let (engine, repo, publisher) = make_engine();

    // D (1) + 5 credits = 6 < 8: short by 2.
    let mut request = fair_request();
    request.offered_lead_ids = vec![LeadId::new("offer-d")];
    request.additional_credits = Credits::new(dec!(5));

    let err = engine.apply(request).await.unwrap_err();
    match err {
        ExchangeError::InvalidArgument { message } => assert!(message.contains("2")),
        other => panic!("unexpected error: {other}"),
    }

    assert!(repo.is_empty());
    assert!(publisher.recorded().is_empty());

    // Topping up to 7 credits covers the gap.
    let mut request = fair_request();
    request.offered_lead_ids = vec![LeadId::new("offer-d")];
    request.additional_credits = Credits::new(dec!(7));

    let app = engine.apply(request).await.unwrap();
    assert_eq!(app.status(), ExchangeStatus::Pending);
}

#[tokio::test]
async fn concurrent_reviews_let_exactly_one_win() {
    let (engine, _, _) = make_engine();
    let app = engine.apply(fair_request()).await.unwrap();

    let owner = UserId::new(OWNER);
    let approve = engine.approve_exchange(app.id(), &owner, "yes");
    let reject = engine.reject_exchange(app.id(), &owner, "no");
    let (first, second) = tokio::join!(approve, reject);

    // One review lands, the other sees the already-reviewed status.
    assert!(first.is_ok() != second.is_ok());

    let stored = engine.get_application(app.id()).await.unwrap();
    assert!(matches!(
        stored.status(),
        ExchangeStatus::Approved | ExchangeStatus::Rejected
    ));
    assert_eq!(stored.version(), 2);
}

#[tokio::test]
async fn cancellation_notifies_the_other_party() {
    let (engine, _, publisher) = make_engine();
    let app = engine.apply(fair_request()).await.unwrap();

    engine
        .cancel_exchange(app.id(), &UserId::new(APPLICANT))
        .await
        .unwrap();

    let events = publisher.recorded();
    let cancelled = events.last().unwrap();
    assert_eq!(cancelled.event_type, ExchangeEventType::ApplicationCancelled);
    assert_eq!(cancelled.recipients, vec![UserId::new(OWNER)]);

    // A cancelled application cannot be reviewed afterwards.
    let err = engine
        .approve_exchange(app.id(), &UserId::new(OWNER), "too late")
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidStateTransition { .. }));
}

#[tokio::test]
async fn query_surfaces_both_sides_of_the_trade() {
    let (engine, _, _) = make_engine();
    let app = engine.apply(fair_request()).await.unwrap();

    let outgoing = engine
        .get_user_applications(&UserId::new(APPLICANT), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(outgoing.total, 1);
    assert_eq!(outgoing.items[0].id(), app.id());

    let incoming = engine
        .get_received_applications(&UserId::new(OWNER), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(incoming.total, 1);
    assert_eq!(incoming.items[0].id(), app.id());
}

#[tokio::test(start_paused = true)]
async fn sweeper_expires_and_stays_idempotent() {
    let (engine, repo, publisher) = make_engine();

    let stale = engine.apply(fair_request()).await.unwrap();
    repo.backdate_created_at(stale.id(), chrono::Duration::hours(100));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = ExpirySweeper::new(
        Arc::clone(&engine),
        ExpirySweeperConfig {
            enabled: true,
            interval_secs: 60,
        },
    );
    let worker = tokio::spawn(sweeper.run(shutdown_rx));

    tokio::time::sleep(std::time::Duration::from_secs(130)).await;
    shutdown_tx.send(true).unwrap();
    worker.await.unwrap();

    let swept = engine.get_application(stale.id()).await.unwrap();
    assert_eq!(swept.status(), ExchangeStatus::Expired);

    // Despite multiple ticks, the expiry fired exactly once.
    let expiry_events = publisher
        .recorded()
        .iter()
        .filter(|e| e.event_type == ExchangeEventType::ExchangeExpired)
        .count();
    assert_eq!(expiry_events, 1);
}

#[tokio::test]
async fn buffered_pipeline_delivers_events_to_a_worker() {
    let repo = Arc::new(InMemoryApplicationRepository::new());
    let (publisher, mut rx) = BufferedEventPublisher::new(16);
    let engine = ExchangeEngine::new(
        seeded_leads(),
        repo,
        Arc::new(publisher),
        FairnessEvaluator::new(ValuationTable::default()),
    );

    let app = engine.apply(fair_request()).await.unwrap();
    engine
        .approve_exchange(app.id(), &UserId::new(OWNER), "deal")
        .await
        .unwrap();

    let submitted = rx.recv().await.unwrap();
    assert_eq!(submitted.event_type, ExchangeEventType::ApplicationSubmitted);

    let approved = rx.recv().await.unwrap();
    assert_eq!(approved.event_type, ExchangeEventType::ApplicationApproved);
    assert_eq!(approved.recipients, vec![UserId::new(APPLICANT)]);
}
