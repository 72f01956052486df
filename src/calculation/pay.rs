//! Pay arithmetic: bucketed pay computation, additive rate multipliers
//! and the blended overtime rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::hours::HoursSplit;
use super::money::round_to_cents;
use crate::models::RateMultiplierType;

/// Default overtime premium: time and a half.
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Default double-time premium.
pub const DEFAULT_DOUBLE_TIME_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Gross pay broken down by rate bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Pay for regular hours.
    pub regular_pay: Decimal,
    /// Pay for overtime hours.
    pub overtime_pay: Decimal,
    /// Pay for double-time hours.
    pub double_time_pay: Decimal,
    /// Sum of the three buckets.
    pub total_pay: Decimal,
}

/// Computes gross pay for a split of hours at a base rate.
///
/// Each bucket is rounded to cents independently before summing, so the
/// total always equals the sum of the printed line items.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{pay_for_hours, HoursSplit,
///     DEFAULT_OVERTIME_MULTIPLIER, DEFAULT_DOUBLE_TIME_MULTIPLIER};
/// use rust_decimal::Decimal;
///
/// let split = HoursSplit {
///     regular: Decimal::from(40),
///     overtime: Decimal::from(5),
///     double_time: Decimal::ZERO,
/// };
/// let pay = pay_for_hours(
///     &split,
///     Decimal::from(20),
///     DEFAULT_OVERTIME_MULTIPLIER,
///     DEFAULT_DOUBLE_TIME_MULTIPLIER,
/// );
/// assert_eq!(pay.total_pay, Decimal::from(950));
/// ```
pub fn pay_for_hours(
    split: &HoursSplit,
    base_rate: Decimal,
    overtime_multiplier: Decimal,
    double_time_multiplier: Decimal,
) -> PayBreakdown {
    let regular_pay = round_to_cents(split.regular * base_rate);
    let overtime_pay = round_to_cents(split.overtime * base_rate * overtime_multiplier);
    let double_time_pay = round_to_cents(split.double_time * base_rate * double_time_multiplier);
    PayBreakdown {
        regular_pay,
        overtime_pay,
        double_time_pay,
        total_pay: regular_pay + overtime_pay + double_time_pay,
    }
}

/// A rate premium applied to a shift's base rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateMultiplier {
    /// Why the premium applies.
    pub multiplier_type: RateMultiplierType,
    /// The factor, e.g. 1.10 for a 10% differential.
    pub multiplier: Decimal,
}

/// Applies rate premiums additively to a base rate.
///
/// Each premium contributes `base * (factor - 1)` on top of the base
/// rate; premiums never compound on each other. A weekend 1.10 plus a
/// holiday 1.50 on a $20.00 base yields $20 + $2 + $10 = $32.00, not
/// 20 * 1.10 * 1.50.
pub fn apply_rate_multipliers(base_rate: Decimal, multipliers: &[RateMultiplier]) -> Decimal {
    let premium: Decimal = multipliers
        .iter()
        .map(|m| base_rate * (m.multiplier - Decimal::ONE))
        .sum();
    round_to_cents(base_rate + premium)
}

/// Computes the blended overtime rate from period earnings.
///
/// The regular rate of pay is total earnings over regular hours, and the
/// overtime rate is that blended rate times the premium multiplier. Zero
/// regular hours yields a zero rate rather than a division error.
pub fn blended_overtime_rate(
    total_earnings: Decimal,
    regular_hours: Decimal,
    overtime_multiplier: Decimal,
) -> Decimal {
    if regular_hours <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_to_cents(total_earnings / regular_hours * overtime_multiplier)
}
