//! Calculation engines for the payroll system.
//!
//! This module contains the pure calculation functions: hour splitting
//! under several jurisdictional overtime variants, pay and rate-multiplier
//! arithmetic, federal/state/FICA tax withholding, ordered deduction and
//! garnishment application, and the time-entry discrepancy detector.
//!
//! Everything here is pure and stateless; only the orchestrator touches
//! persistent state.

mod deductions;
mod discrepancy;
mod federal_tax;
mod fica;
mod garnishments;
mod hours;
mod money;
mod pay;
mod state_tax;
mod taxes;

pub use deductions::{AppliedDeduction, DeductionBatch, calculate_all_deductions, deduction_amount};
pub use discrepancy::{
    MAX_DAILY_HOURS, MAX_ENTRY_SPAN_HOURS, MAX_PERIOD_HOURS, MIN_ENTRY_HOURS, detect_discrepancies,
};
pub use federal_tax::{AggregateParams, federal_income_tax, supplemental_withholding};
pub use fica::{additional_medicare_tax, medicare_tax, social_security_tax};
pub use garnishments::{garnishment_amount, sort_garnishments_by_priority};
pub use hours::{
    DEFAULT_DAILY_DOUBLE_TIME_THRESHOLD, DEFAULT_DAILY_OVERTIME_THRESHOLD,
    DEFAULT_LIVE_IN_THRESHOLD, DEFAULT_WEEKLY_OVERTIME_THRESHOLD, HoursSplit, split_daily_hours,
    split_hours, split_live_in_hours, split_seventh_day_hours,
};
pub use money::{clamp_non_negative, round_to_cents};
pub use pay::{
    DEFAULT_DOUBLE_TIME_MULTIPLIER, DEFAULT_OVERTIME_MULTIPLIER, PayBreakdown, RateMultiplier,
    apply_rate_multipliers, blended_overtime_rate, pay_for_hours,
};
pub use state_tax::{local_income_tax, state_income_tax};
pub use taxes::{TaxWithholding, calculate_all_taxes};
