//! Pay stub model: the immutable-once-calculated snapshot for one
//! caregiver in one pay period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::calculation::{AppliedDeduction, TaxWithholding};
use crate::error::{EngineError, EngineResult};

use super::status::StatusChange;

/// How a caregiver receives their net pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// ACH direct deposit.
    DirectDeposit,
    /// Paper check.
    Check,
    /// Cash.
    Cash,
}

/// Lifecycle status of a pay stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayStubStatus {
    /// Being calculated.
    Draft,
    /// Calculation complete.
    Calculated,
    /// Awaiting approval.
    PendingApproval,
    /// Approved for disbursement.
    Approved,
    /// Disbursement initiated.
    PaymentPending,
    /// Paid; terminal.
    Paid,
    /// Voided and superseded; terminal. The stub is retained.
    Void,
    /// Cancelled before disbursement; terminal.
    Cancelled,
}

impl PayStubStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PayStubStatus::Paid | PayStubStatus::Void | PayStubStatus::Cancelled
        )
    }

    /// Returns true if the requested transition is legal.
    pub fn can_transition_to(&self, to: PayStubStatus) -> bool {
        use PayStubStatus::*;
        if to == Void || to == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, to),
            (Draft, Calculated)
                | (Calculated, PendingApproval)
                | (PendingApproval, Approved)
                | (Approved, PaymentPending)
                | (PaymentPending, Paid)
        )
    }
}

impl fmt::Display for PayStubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayStubStatus::Draft => "Draft",
            PayStubStatus::Calculated => "Calculated",
            PayStubStatus::PendingApproval => "PendingApproval",
            PayStubStatus::Approved => "Approved",
            PayStubStatus::PaymentPending => "PaymentPending",
            PayStubStatus::Paid => "Paid",
            PayStubStatus::Void => "Void",
            PayStubStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// Year-to-date rollups carried on a pay stub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearToDate {
    /// Gross pay for the year, including this stub.
    pub gross_pay: Decimal,
    /// Net pay for the year, including this stub.
    pub net_pay: Decimal,
    /// Total taxes withheld for the year, including this stub.
    pub total_taxes: Decimal,
    /// Total non-statutory deductions for the year, including this stub.
    pub total_deductions: Decimal,
}

/// One caregiver's computed pay for one pay period.
///
/// Immutable once calculated: corrections are made by voiding the stub
/// (`is_void`) and issuing a replacement, never by deletion or edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayStub {
    /// Unique identifier.
    pub id: Uuid,
    /// The caregiver this stub pays.
    pub caregiver_id: String,
    /// The pay run that produced this stub, once assigned.
    pub pay_run_id: Option<Uuid>,
    /// The approved time sheet this stub was calculated from.
    pub time_sheet_id: Uuid,
    /// The pay period this stub settles.
    pub pay_period_id: Uuid,
    /// Hours paid at the regular rate.
    pub regular_hours: Decimal,
    /// Hours paid at the overtime rate.
    pub overtime_hours: Decimal,
    /// Hours paid at the double-time rate.
    pub double_time_hours: Decimal,
    /// PTO, holiday, sick and other non-worked paid hours.
    pub other_hours: Decimal,
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Taxable income after pre-tax deductions.
    pub taxable_income: Decimal,
    /// Itemized tax withholding.
    pub taxes: TaxWithholding,
    /// Itemized deductions with their calculated amounts.
    pub deductions: Vec<AppliedDeduction>,
    /// Sum of pre-tax deduction amounts.
    pub pre_tax_total: Decimal,
    /// Sum of post-tax deduction amounts, garnishments included.
    pub post_tax_total: Decimal,
    /// Net pay for the period.
    pub net_pay: Decimal,
    /// Year-to-date rollups including this stub.
    pub ytd: YearToDate,
    /// How the net pay is disbursed.
    pub payment_method: PaymentMethod,
    /// True once the stub has been voided and superseded.
    pub is_void: bool,
    /// Current lifecycle status.
    pub status: PayStubStatus,
    /// Append-only status history.
    pub history: Vec<StatusChange<PayStubStatus>>,
}

impl PayStub {
    /// Transitions the stub to a new status, appending to the history log.
    pub fn transition(
        &mut self,
        to: PayStubStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> EngineResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(EngineError::InvalidStatusTransition {
                entity: "PayStub",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.history.push(StatusChange::new(self.status, to, actor, reason));
        self.status = to;
        Ok(())
    }

    /// Voids the stub, superseding it without deleting it.
    pub fn void(&mut self, actor: &str, reason: &str) -> EngineResult<()> {
        self.transition(PayStubStatus::Void, actor, Some(reason))?;
        self.is_void = true;
        Ok(())
    }
}
