// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Exchange Engine - Rust Core Library
//!
//! Deterministic exchange engine for the LeadSwap lead trading system.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `exchange`: `ExchangeApplication` aggregate, status lifecycle,
//!     valuation/fairness services, lifecycle events
//!   - `leads`: Read model for leads and their ratings
//!   - `shared`: Typed ids, credits, timestamps, pagination
//!
//! - **Application**: Orchestration
//!   - `ports`: Interfaces for external systems (`LeadReadPort`, `EventPublisherPort`)
//!   - `engine`: `ExchangeEngine` (apply/approve/reject/cancel/complete/sweep)
//!   - `services`: `ExpirySweeper` periodic driver
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Application repository and lead store (in-memory)
//!   - `messaging`: Buffered event publisher with a drain worker

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Engine orchestration and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::exchange::{
    ApplicationRepository, CreateApplicationCommand, ExchangeApplication, ExchangeError,
    ExchangeEvent, ExchangeEventType, ExchangeStatus, ExchangeValidation, FairnessEvaluator,
    ValuationTable,
};
pub use domain::leads::{Lead, LeadRating};
pub use domain::shared::{
    ApplicationId, Credits, LeadId, Page, PageRequest, Timestamp, UserId,
};

// Application re-exports
pub use application::dto::ApplyRequest;
pub use application::engine::ExchangeEngine;
pub use application::ports::{
    EventPublishError, EventPublisherPort, LeadReadError, LeadReadPort, NoOpEventPublisher,
};
pub use application::services::{ExpirySweeper, ExpirySweeperConfig};

// Infrastructure re-exports
pub use infrastructure::messaging::{BufferedEventPublisher, RecordingEventPublisher};
pub use infrastructure::persistence::{InMemoryApplicationRepository, InMemoryLeadStore};
