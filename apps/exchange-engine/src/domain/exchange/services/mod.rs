//! Exchange Domain Services
//!
//! Stateless business logic: the valuation table and fairness evaluator.

mod fairness;
mod valuation;

pub use fairness::{ExchangeValidation, FairnessEvaluator};
pub use valuation::ValuationTable;
