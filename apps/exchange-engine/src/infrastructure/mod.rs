//! Infrastructure Layer
//!
//! Adapters implementing the domain and application ports.

pub mod messaging;
pub mod persistence;
