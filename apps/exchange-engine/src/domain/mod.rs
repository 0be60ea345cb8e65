//! Domain Layer
//!
//! Core business logic organized by bounded context, with no dependencies
//! on application or infrastructure code.

pub mod exchange;
pub mod leads;
pub mod shared;
