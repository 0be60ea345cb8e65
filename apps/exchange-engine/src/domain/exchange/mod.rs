//! Exchange Bounded Context
//!
//! Application lifecycle, valuation, and fairness rules for lead trading.

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{CreateApplicationCommand, ExchangeApplication, ReconstitutedApplicationParams};
pub use errors::ExchangeError;
pub use events::{ExchangeEvent, ExchangeEventType};
pub use repository::ApplicationRepository;
pub use services::{ExchangeValidation, FairnessEvaluator, ValuationTable};
pub use value_objects::ExchangeStatus;
