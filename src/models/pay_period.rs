//! Pay period model and lifecycle state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::status::StatusChange;

/// The cadence at which a caregiver is paid.
///
/// Used by the tax engine to convert annual W-4 elections into per-period
/// equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriodType {
    /// 52 pay periods per year.
    Weekly,
    /// 26 pay periods per year.
    BiWeekly,
    /// 24 pay periods per year.
    SemiMonthly,
    /// 12 pay periods per year.
    Monthly,
}

impl PayPeriodType {
    /// Returns the number of pay periods per year for this cadence.
    pub fn periods_per_year(&self) -> rust_decimal::Decimal {
        use rust_decimal::Decimal;
        match self {
            PayPeriodType::Weekly => Decimal::from(52),
            PayPeriodType::BiWeekly => Decimal::from(26),
            PayPeriodType::SemiMonthly => Decimal::from(24),
            PayPeriodType::Monthly => Decimal::from(12),
        }
    }
}

/// Lifecycle status of a pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriodStatus {
    /// Newly created; not yet accepting time.
    Draft,
    /// Accepting time entries.
    Open,
    /// Time entry closed; eligible for a pay run.
    Locked,
    /// A pay run is executing against this period.
    Processing,
    /// Awaiting approval of the pay run results.
    PendingApproval,
    /// Pay run results approved.
    Approved,
    /// Payments disbursed.
    Paid,
    /// Period finalized; terminal.
    Closed,
    /// Period cancelled; terminal.
    Cancelled,
}

impl PayPeriodStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PayPeriodStatus::Closed | PayPeriodStatus::Cancelled)
    }

    /// Returns true if the requested transition is legal.
    ///
    /// `Cancelled` is reachable from any non-terminal state; the forward
    /// path is `Draft → Open → Locked → Processing → (PendingApproval) →
    /// Approved → Paid → Closed`.
    pub fn can_transition_to(&self, to: PayPeriodStatus) -> bool {
        use PayPeriodStatus::*;
        if to == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, to),
            (Draft, Open)
                | (Open, Locked)
                | (Locked, Processing)
                | (Processing, PendingApproval)
                | (Processing, Approved)
                | (PendingApproval, Approved)
                | (Approved, Paid)
                | (Paid, Closed)
        )
    }
}

impl fmt::Display for PayPeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayPeriodStatus::Draft => "Draft",
            PayPeriodStatus::Open => "Open",
            PayPeriodStatus::Locked => "Locked",
            PayPeriodStatus::Processing => "Processing",
            PayPeriodStatus::PendingApproval => "PendingApproval",
            PayPeriodStatus::Approved => "Approved",
            PayPeriodStatus::Paid => "Paid",
            PayPeriodStatus::Closed => "Closed",
            PayPeriodStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// A pay period: the date window a pay run settles.
///
/// Created in `Draft` and never destroyed; the lifecycle is soft only.
/// Owns at most one pay run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayPeriod, PayPeriodStatus, PayPeriodType};
/// use chrono::NaiveDate;
///
/// let mut period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 17).unwrap(),
///     PayPeriodType::BiWeekly,
/// );
/// assert_eq!(period.status, PayPeriodStatus::Draft);
/// period.transition(PayPeriodStatus::Open, "admin", None).unwrap();
/// period.transition(PayPeriodStatus::Locked, "admin", Some("cutoff reached")).unwrap();
/// assert!(period.can_start_pay_run());
/// assert_eq!(period.history.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Unique identifier.
    pub id: Uuid,
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// The date caregivers are paid for this period.
    pub pay_date: NaiveDate,
    /// The deadline for time sheet submission.
    pub cutoff_date: NaiveDate,
    /// The pay cadence, used to annualize per-period tax figures.
    pub period_type: PayPeriodType,
    /// Current lifecycle status.
    pub status: PayPeriodStatus,
    /// Append-only status history.
    pub history: Vec<StatusChange<PayPeriodStatus>>,
    /// The pay run executed against this period, once one exists.
    pub pay_run_id: Option<Uuid>,
}

impl PayPeriod {
    /// Creates a new pay period in `Draft` status.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        pay_date: NaiveDate,
        cutoff_date: NaiveDate,
        period_type: PayPeriodType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date,
            pay_date,
            cutoff_date,
            period_type,
            status: PayPeriodStatus::Draft,
            history: Vec::new(),
            pay_run_id: None,
        }
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if a pay run may be started against this period.
    pub fn can_start_pay_run(&self) -> bool {
        matches!(
            self.status,
            PayPeriodStatus::Locked | PayPeriodStatus::Processing
        )
    }

    /// Transitions the period to a new status, appending to the history log.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` if the state machine forbids the
    /// requested transition.
    pub fn transition(
        &mut self,
        to: PayPeriodStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> EngineResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(EngineError::InvalidStatusTransition {
                entity: "PayPeriod",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.history.push(StatusChange::new(self.status, to, actor, reason));
        self.status = to;
        Ok(())
    }
}
