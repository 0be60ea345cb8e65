//! Fairness evaluation for proposed trades.
//!
//! Two distinct policies live here on purpose:
//!
//! - [`FairnessEvaluator::is_fair`] is a two-sided tolerance-band check
//!   (offered value within ±10% of the target's value), available for
//!   review-assist surfaces.
//! - [`FairnessEvaluator::validate`] is the hard floor that gates
//!   application creation: offered value plus credit top-up must meet or
//!   exceed the target's value.
//!
//! Callers choose which gate to enforce; the engine's `apply` path uses
//! `validate` only.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::ValuationTable;
use crate::domain::leads::{Lead, LeadRating};
use crate::domain::shared::Credits;

/// Outcome of [`FairnessEvaluator::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeValidation {
    /// Whether the proposed trade is admissible.
    pub valid: bool,
    /// Human-readable verdict.
    pub message: String,
}

impl ExchangeValidation {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Computes offered/target values and fairness verdicts for a trade.
///
/// All arithmetic is exact decimal; values feed eligibility decisions.
#[derive(Debug, Clone)]
pub struct FairnessEvaluator {
    table: ValuationTable,
    tolerance: Decimal,
}

impl FairnessEvaluator {
    /// Default tolerance band: ±10% of the target lead's value.
    pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

    /// Create an evaluator over the given valuation table with the default
    /// 10% tolerance band.
    #[must_use]
    pub const fn new(table: ValuationTable) -> Self {
        Self {
            table,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Create an evaluator with an explicit tolerance fraction.
    #[must_use]
    pub const fn with_tolerance(table: ValuationTable, tolerance: Decimal) -> Self {
        Self { table, tolerance }
    }

    /// The valuation table backing this evaluator.
    #[must_use]
    pub const fn table(&self) -> &ValuationTable {
        &self.table
    }

    /// Value of a single lead; an absent or unrated lead is worth zero.
    #[must_use]
    pub fn lead_value(&self, lead: Option<&Lead>) -> Credits {
        let points = lead.map_or(0, |l| self.table.value_of_opt(l.rating));
        Credits::from_points(points)
    }

    /// Sum of lead values; the empty list is worth zero.
    #[must_use]
    pub fn total_value(&self, leads: &[Lead]) -> Credits {
        leads
            .iter()
            .map(|lead| self.lead_value(Some(lead)))
            .fold(Credits::ZERO, |acc, v| acc + v)
    }

    /// Signed value delta: offered minus target.
    ///
    /// Positive means the offered side overvalues the target, negative
    /// means it undervalues.
    #[must_use]
    pub fn value_difference(&self, offered: &[Lead], target: &Lead) -> Credits {
        self.total_value(offered) - self.lead_value(Some(target))
    }

    /// Credits the applicant must top up to reach the target's value.
    ///
    /// Always non-negative; zero when the offered value already meets or
    /// exceeds the target value.
    #[must_use]
    pub fn required_credits(&self, offered: &[Lead], target: &Lead) -> Credits {
        (-self.value_difference(offered, target)).max_zero()
    }

    /// Tolerance-band fairness check, asymmetric by design: the band is
    /// computed against the target's value, not the offered value.
    #[must_use]
    pub fn is_fair(&self, offered: &[Lead], target: &Lead) -> bool {
        let target_value = self.lead_value(Some(target)).amount();
        let difference = self.value_difference(offered, target).abs().amount();
        difference <= target_value * self.tolerance
    }

    /// Hard-floor admissibility check for application creation.
    ///
    /// Unlike [`Self::is_fair`] this does not apply the tolerance band; the
    /// offered value plus credit top-up must meet or exceed the target's
    /// value outright.
    #[must_use]
    pub fn validate(
        &self,
        offered: &[Lead],
        target: Option<&Lead>,
        additional_credits: Credits,
    ) -> ExchangeValidation {
        let Some(target) = target else {
            return ExchangeValidation::fail("target lead does not exist");
        };

        if offered.is_empty() && !additional_credits.is_positive() {
            return ExchangeValidation::fail("must offer leads or credits");
        }

        let target_value = self.lead_value(Some(target));
        let total_offered = self.total_value(offered) + additional_credits.max_zero();

        if total_offered < target_value {
            let shortfall = target_value - total_offered;
            return ExchangeValidation::fail(format!(
                "offered value is insufficient, {shortfall} more credits required"
            ));
        }

        ExchangeValidation::ok("exchange conditions met")
    }

    /// How many leads of the given rating the credits can buy outright.
    ///
    /// Floor division; zero when the rating is worth nothing or no credits
    /// are available.
    #[must_use]
    pub fn exchangeable_count(&self, available_credits: Credits, target_rating: LeadRating) -> u32 {
        let rating_value = self.table.value_of(target_rating);
        if rating_value == 0 || !available_credits.is_positive() {
            return 0;
        }

        let count = (available_credits.amount() / Decimal::from(rating_value)).floor();
        count.to_u32().unwrap_or(0)
    }
}
