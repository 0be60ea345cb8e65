//! Application Layer
//!
//! Orchestrates domain objects through driven ports. Contains no
//! business rules of its own beyond sequencing and authorization checks.

pub mod dto;
pub mod engine;
pub mod ports;
pub mod services;

pub use dto::ApplyRequest;
pub use engine::ExchangeEngine;
