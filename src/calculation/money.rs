//! Shared monetary rounding helpers.
//!
//! All dollar amounts are rounded to two places at the point of
//! computation, never accumulated unrounded across steps, so that large
//! batches cannot drift by fractions of a cent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a dollar amount to cents, half away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let raw = Decimal::from_str("37.205").unwrap();
/// assert_eq!(round_to_cents(raw), Decimal::from_str("37.21").unwrap());
/// ```
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a monetary amount to be non-negative.
pub fn clamp_non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
