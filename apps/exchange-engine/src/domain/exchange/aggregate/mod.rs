//! Exchange Application Aggregate

mod exchange_application;

pub use exchange_application::{
    CreateApplicationCommand, ExchangeApplication, ReconstitutedApplicationParams,
};
