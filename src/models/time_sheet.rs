//! Time sheet model: entries, category summaries, adjustments and the
//! approval state machine.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::discrepancy::DiscrepancyFlag;
use super::status::StatusChange;

/// The kind of rate adjustment applied to an entry's base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMultiplierType {
    /// Evening/overnight shift differential.
    ShiftDifferential,
    /// Weekend premium.
    Weekend,
    /// Holiday premium.
    Holiday,
    /// Hazard or complex-care premium.
    Hazard,
    /// Anything else.
    Other,
}

/// A rate multiplier as applied to one entry, recorded with enough detail
/// to reconstruct the final rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRateMultiplier {
    /// The kind of adjustment.
    pub multiplier_type: RateMultiplierType,
    /// The multiplier factor (e.g. 1.10 for a 10% premium).
    pub factor: Decimal,
    /// The base rate the factor was applied against.
    pub base_rate: Decimal,
    /// The dollar-per-hour delta this multiplier contributed.
    pub amount_delta: Decimal,
}

/// One worked interval on a time sheet.
///
/// `clock_out > clock_in` is expected but not enforced here: a violation is
/// recorded as a discrepancy flag by the detector, never rejected, so the
/// sheet stays auditable. Break hours are excluded from paid totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSheetEntry {
    /// Identifier of the source time record.
    pub id: String,
    /// The date the work is attributed to.
    pub work_date: NaiveDate,
    /// Clock-in time.
    pub clock_in: NaiveDateTime,
    /// Clock-out time.
    pub clock_out: NaiveDateTime,
    /// Hours paid at the regular rate.
    pub regular_hours: Decimal,
    /// Hours paid at the overtime rate.
    pub overtime_hours: Decimal,
    /// Hours paid at the double-time rate.
    pub double_time_hours: Decimal,
    /// Unpaid break hours within the interval.
    pub break_hours: Decimal,
    /// The base hourly rate for the entry.
    pub base_rate: Decimal,
    /// Rate multipliers applied on top of the base rate.
    #[serde(default)]
    pub multipliers: Vec<AppliedRateMultiplier>,
    /// Dollar earnings for the entry.
    pub earnings: Decimal,
    /// Pre-flagged for review by upstream compliance checks.
    #[serde(default)]
    pub requires_review: bool,
    /// Optional service/visit code from the time source.
    #[serde(default)]
    pub service_code: Option<String>,
}

impl TimeSheetEntry {
    /// Total paid hours for the entry. Break hours are excluded.
    pub fn total_hours(&self) -> Decimal {
        self.regular_hours + self.overtime_hours + self.double_time_hours
    }

    /// Hours between the punches, which can be negative for a bad pair.
    pub fn punch_duration_hours(&self) -> Decimal {
        let minutes = (self.clock_out - self.clock_in).num_minutes();
        Decimal::from(minutes) / Decimal::from(60)
    }
}

/// Hours and earnings for one pay category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Hours in this category.
    pub hours: Decimal,
    /// Earnings in this category.
    pub earnings: Decimal,
}

/// Per-category hour and earnings summary for a time sheet.
///
/// Invariant, maintained by the compiler: the sheet's total hours equal the
/// sum of category hours, and gross earnings equal the sum of category
/// earnings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Regular-rate work.
    pub regular: CategoryTotal,
    /// Overtime-rate work.
    pub overtime: CategoryTotal,
    /// Double-time-rate work.
    pub double_time: CategoryTotal,
    /// Paid time off.
    pub pto: CategoryTotal,
    /// Holiday pay.
    pub holiday: CategoryTotal,
    /// Sick pay.
    pub sick: CategoryTotal,
    /// Anything else.
    pub other: CategoryTotal,
}

impl CategorySummary {
    fn categories(&self) -> [CategoryTotal; 7] {
        [
            self.regular,
            self.overtime,
            self.double_time,
            self.pto,
            self.holiday,
            self.sick,
            self.other,
        ]
    }

    /// Sum of hours across every category.
    pub fn total_hours(&self) -> Decimal {
        self.categories().iter().map(|c| c.hours).sum()
    }

    /// Sum of earnings across every category.
    pub fn total_earnings(&self) -> Decimal {
        self.categories().iter().map(|c| c.earnings).sum()
    }
}

/// The kind of a pay adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Discretionary or contractual bonus.
    Bonus,
    /// Expense reimbursement.
    Reimbursement,
    /// Anything else.
    Other,
}

/// A one-off amount added to a time sheet's gross pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Unique identifier.
    pub id: Uuid,
    /// The kind of adjustment.
    pub adjustment_type: AdjustmentType,
    /// The dollar amount (may be negative for a correction).
    pub amount: Decimal,
    /// Human-readable description.
    pub description: String,
    /// Where the adjustment came from (system, user, import).
    pub source: String,
}

/// Lifecycle status of a time sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSheetStatus {
    /// Being compiled or edited.
    Draft,
    /// Submitted by the caregiver.
    Submitted,
    /// Under supervisor review.
    PendingReview,
    /// Approved; eligible for a pay run.
    Approved,
    /// Included in an executing pay run.
    Processing,
    /// Paid; terminal.
    Paid,
    /// Rejected back to the caregiver.
    Rejected,
    /// Voided; terminal.
    Voided,
}

impl TimeSheetStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TimeSheetStatus::Paid | TimeSheetStatus::Voided)
    }

    /// Returns true if the requested transition is legal.
    pub fn can_transition_to(&self, to: TimeSheetStatus) -> bool {
        use TimeSheetStatus::*;
        if to == Voided {
            return !self.is_terminal();
        }
        matches!(
            (self, to),
            (Draft, Submitted)
                | (Submitted, PendingReview)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (PendingReview, Approved)
                | (PendingReview, Rejected)
                | (Rejected, Draft)
                | (Approved, Processing)
                | (Processing, Paid)
        )
    }
}

impl fmt::Display for TimeSheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeSheetStatus::Draft => "Draft",
            TimeSheetStatus::Submitted => "Submitted",
            TimeSheetStatus::PendingReview => "PendingReview",
            TimeSheetStatus::Approved => "Approved",
            TimeSheetStatus::Processing => "Processing",
            TimeSheetStatus::Paid => "Paid",
            TimeSheetStatus::Rejected => "Rejected",
            TimeSheetStatus::Voided => "Voided",
        };
        f.write_str(name)
    }
}

/// One caregiver's compiled time for one pay period.
///
/// Invariants: `total_hours() == summary.total_hours()`,
/// `gross_earnings() == summary.total_earnings()`, and
/// `total_gross_pay() == gross_earnings() + Σ adjustment amounts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSheet {
    /// Unique identifier.
    pub id: Uuid,
    /// The caregiver this sheet belongs to.
    pub caregiver_id: String,
    /// The pay period this sheet covers.
    pub pay_period_id: Uuid,
    /// Worked intervals, ordered as compiled.
    pub entries: Vec<TimeSheetEntry>,
    /// Per-category hour/earnings summary.
    pub summary: CategorySummary,
    /// One-off pay adjustments.
    pub adjustments: Vec<Adjustment>,
    /// Flags raised by the discrepancy detector.
    pub discrepancies: Vec<DiscrepancyFlag>,
    /// Current lifecycle status.
    pub status: TimeSheetStatus,
    /// Append-only status history.
    pub history: Vec<StatusChange<TimeSheetStatus>>,
}

impl TimeSheet {
    /// Creates an empty time sheet in `Draft` status.
    pub fn new(caregiver_id: &str, pay_period_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            caregiver_id: caregiver_id.to_string(),
            pay_period_id,
            entries: Vec::new(),
            summary: CategorySummary::default(),
            adjustments: Vec::new(),
            discrepancies: Vec::new(),
            status: TimeSheetStatus::Draft,
            history: Vec::new(),
        }
    }

    /// Total paid hours across all categories.
    pub fn total_hours(&self) -> Decimal {
        self.summary.total_hours()
    }

    /// Gross earnings across all categories, before adjustments.
    pub fn gross_earnings(&self) -> Decimal {
        self.summary.total_earnings()
    }

    /// Gross earnings plus adjustments; the gross pay fed to the tax and
    /// deduction engines.
    pub fn total_gross_pay(&self) -> Decimal {
        self.gross_earnings() + self.adjustments.iter().map(|a| a.amount).sum::<Decimal>()
    }

    /// The number of unresolved flags that block approval.
    pub fn unresolved_blocking_flags(&self) -> usize {
        self.discrepancies.iter().filter(|f| f.is_blocking()).count()
    }

    /// Resolves the discrepancy flag at `index`, recording the actor.
    ///
    /// Returns false if the index is out of range.
    pub fn resolve_flag(&mut self, index: usize, actor: &str) -> bool {
        match self.discrepancies.get_mut(index) {
            Some(flag) => {
                flag.resolve(actor);
                true
            }
            None => false,
        }
    }

    /// Transitions the sheet to a new status, appending to the history log.
    pub fn transition(
        &mut self,
        to: TimeSheetStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> EngineResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(EngineError::InvalidStatusTransition {
                entity: "TimeSheet",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.history.push(StatusChange::new(self.status, to, actor, reason));
        self.status = to;
        Ok(())
    }

    /// Approves the sheet for payroll.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedDiscrepancies` if any flag requiring resolution
    /// is unresolved, or `InvalidStatusTransition` if the sheet is not in
    /// a reviewable state.
    pub fn approve(&mut self, actor: &str) -> EngineResult<()> {
        let blocking = self.unresolved_blocking_flags();
        if blocking > 0 {
            return Err(EngineError::UnresolvedDiscrepancies {
                time_sheet_id: self.id,
                blocking,
            });
        }
        self.transition(TimeSheetStatus::Approved, actor, None)
    }
}
