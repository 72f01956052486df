//! Hour splitting under jurisdictional overtime variants.
//!
//! The core split puts hours up to the regular threshold in the regular
//! bucket, hours between the regular and double-time thresholds in the
//! overtime bucket, and the remainder in double time. The daily,
//! seventh-consecutive-day and live-in variants share the same shape with
//! different thresholds and semantics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default weekly overtime threshold in hours.
pub const DEFAULT_WEEKLY_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Default daily overtime threshold in hours, for jurisdictions with
/// daily overtime law.
pub const DEFAULT_DAILY_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default daily double-time threshold in hours.
pub const DEFAULT_DAILY_DOUBLE_TIME_THRESHOLD: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Default weekly overtime threshold for live-in caregivers, who are
/// exempt from the standard 40-hour rule in many jurisdictions.
pub const DEFAULT_LIVE_IN_THRESHOLD: Decimal = Decimal::from_parts(44, 0, 0, false, 0);

/// Hours split into pay-rate buckets.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{HoursSplit, split_hours, DEFAULT_WEEKLY_OVERTIME_THRESHOLD};
/// use rust_decimal::Decimal;
///
/// let split = split_hours(Decimal::from(45), DEFAULT_WEEKLY_OVERTIME_THRESHOLD, None);
/// assert_eq!(split.regular, Decimal::from(40));
/// assert_eq!(split.overtime, Decimal::from(5));
/// assert_eq!(split.double_time, Decimal::ZERO);
/// assert_eq!(split.total(), Decimal::from(45));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSplit {
    /// Hours at the regular rate.
    pub regular: Decimal,
    /// Hours at the overtime rate.
    pub overtime: Decimal,
    /// Hours at the double-time rate.
    pub double_time: Decimal,
}

impl HoursSplit {
    /// Sum of all buckets.
    pub fn total(&self) -> Decimal {
        self.regular + self.overtime + self.double_time
    }
}

/// Splits total hours into regular/overtime/double-time buckets.
///
/// Hours up to `regular_threshold` are regular; with a double-time
/// threshold, hours between the two thresholds are overtime and the
/// remainder is double time; without one, everything above the regular
/// threshold is overtime. Non-positive totals produce an empty split.
pub fn split_hours(
    total: Decimal,
    regular_threshold: Decimal,
    double_time_threshold: Option<Decimal>,
) -> HoursSplit {
    if total <= Decimal::ZERO {
        return HoursSplit::default();
    }
    if total <= regular_threshold {
        return HoursSplit {
            regular: total,
            ..HoursSplit::default()
        };
    }
    match double_time_threshold {
        Some(dt_threshold) if total > dt_threshold => HoursSplit {
            regular: regular_threshold,
            overtime: dt_threshold - regular_threshold,
            double_time: total - dt_threshold,
        },
        _ => HoursSplit {
            regular: regular_threshold,
            overtime: total - regular_threshold,
            double_time: Decimal::ZERO,
        },
    }
}

/// Splits one shift's hours under daily overtime law: overtime past 8
/// hours, double time past 12.
pub fn split_daily_hours(worked_hours: Decimal) -> HoursSplit {
    split_hours(
        worked_hours,
        DEFAULT_DAILY_OVERTIME_THRESHOLD,
        Some(DEFAULT_DAILY_DOUBLE_TIME_THRESHOLD),
    )
}

/// Splits hours worked on a seventh consecutive worked day.
///
/// Every hour is premium: the first 8 are paid at the overtime rate and
/// the remainder at double time, with zero regular hours.
pub fn split_seventh_day_hours(worked_hours: Decimal) -> HoursSplit {
    if worked_hours <= Decimal::ZERO {
        return HoursSplit::default();
    }
    HoursSplit {
        regular: Decimal::ZERO,
        overtime: worked_hours.min(DEFAULT_DAILY_OVERTIME_THRESHOLD),
        double_time: (worked_hours - DEFAULT_DAILY_OVERTIME_THRESHOLD).max(Decimal::ZERO),
    }
}

/// Splits weekly hours for a live-in caregiver: overtime past 44 hours,
/// no double-time tier.
pub fn split_live_in_hours(total_hours: Decimal) -> HoursSplit {
    split_hours(total_hours, DEFAULT_LIVE_IN_THRESHOLD, None)
}
