//! Pay run model: the batch aggregate for one executed payroll cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::pay_stub::{PayStub, PaymentMethod};
use super::status::StatusChange;

/// Lifecycle status of a pay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayRunStatus {
    /// Created; nothing calculated yet.
    Draft,
    /// Calculating pay stubs.
    Calculating,
    /// All stubs calculated.
    Calculated,
    /// Awaiting approval.
    PendingApproval,
    /// Approved for disbursement.
    Approved,
    /// Disbursement in progress.
    Processing,
    /// Disbursement instructions produced.
    Processed,
    /// Funding confirmed.
    Funded,
    /// Fully settled; terminal.
    Completed,
    /// Failed; terminal.
    Failed,
    /// Cancelled; terminal.
    Cancelled,
}

impl PayRunStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PayRunStatus::Completed | PayRunStatus::Failed | PayRunStatus::Cancelled
        )
    }

    /// Returns true if the requested transition is legal.
    pub fn can_transition_to(&self, to: PayRunStatus) -> bool {
        use PayRunStatus::*;
        match to {
            Cancelled => !self.is_terminal(),
            Failed => matches!(self, Calculating | Processing),
            _ => matches!(
                (self, to),
                (Draft, Calculating)
                    | (Calculating, Calculated)
                    | (Calculated, PendingApproval)
                    | (PendingApproval, Approved)
                    | (Approved, Processing)
                    | (Processing, Processed)
                    | (Processed, Funded)
                    | (Funded, Completed)
            ),
        }
    }
}

impl fmt::Display for PayRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayRunStatus::Draft => "Draft",
            PayRunStatus::Calculating => "Calculating",
            PayRunStatus::Calculated => "Calculated",
            PayRunStatus::PendingApproval => "PendingApproval",
            PayRunStatus::Approved => "Approved",
            PayRunStatus::Processing => "Processing",
            PayRunStatus::Processed => "Processed",
            PayRunStatus::Funded => "Funded",
            PayRunStatus::Completed => "Completed",
            PayRunStatus::Failed => "Failed",
            PayRunStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// One executed payroll cycle for a pay period.
///
/// Aggregate totals are the elementwise sum over constituent pay stubs,
/// maintained by [`PayRun::record_stub`]; `total_pay_stubs` always equals
/// the number of recorded stub ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRun {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable run number (e.g. "PR-20240621-a1b2c3d4").
    pub run_number: String,
    /// The pay period this run settles.
    pub pay_period_id: Uuid,
    /// The pay stubs produced by this run.
    pub pay_stub_ids: Vec<Uuid>,
    /// Count of pay stubs; equals `pay_stub_ids.len()`.
    pub total_pay_stubs: usize,
    /// Sum of stub gross pay.
    pub total_gross: Decimal,
    /// Sum of stub net pay.
    pub total_net: Decimal,
    /// Sum of stub tax withholding.
    pub total_taxes: Decimal,
    /// Sum of stub non-statutory deductions.
    pub total_deductions: Decimal,
    /// Number of stubs paid by direct deposit.
    pub direct_deposit_count: u32,
    /// Net amount paid by direct deposit.
    pub direct_deposit_amount: Decimal,
    /// Number of stubs paid by check.
    pub check_count: u32,
    /// Net amount paid by check.
    pub check_amount: Decimal,
    /// Number of stubs paid in cash.
    pub cash_count: u32,
    /// Net amount paid in cash.
    pub cash_amount: Decimal,
    /// Fatal problems recorded during the run.
    pub errors: Vec<String>,
    /// Non-fatal anomalies recorded during the run.
    pub warnings: Vec<String>,
    /// Current lifecycle status.
    pub status: PayRunStatus,
    /// Append-only status history.
    pub history: Vec<StatusChange<PayRunStatus>>,
}

impl PayRun {
    /// Creates an empty pay run in `Draft` status.
    pub fn new(pay_period_id: Uuid, run_number: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_number,
            pay_period_id,
            pay_stub_ids: Vec::new(),
            total_pay_stubs: 0,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_taxes: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            direct_deposit_count: 0,
            direct_deposit_amount: Decimal::ZERO,
            check_count: 0,
            check_amount: Decimal::ZERO,
            cash_count: 0,
            cash_amount: Decimal::ZERO,
            errors: Vec::new(),
            warnings: Vec::new(),
            status: PayRunStatus::Draft,
            history: Vec::new(),
        }
    }

    /// Folds one calculated pay stub into the run's aggregates.
    pub fn record_stub(&mut self, stub: &PayStub) {
        self.pay_stub_ids.push(stub.id);
        self.total_pay_stubs = self.pay_stub_ids.len();
        self.total_gross += stub.gross_pay;
        self.total_net += stub.net_pay;
        self.total_taxes += stub.taxes.total;
        self.total_deductions += stub.pre_tax_total + stub.post_tax_total;
        match stub.payment_method {
            PaymentMethod::DirectDeposit => {
                self.direct_deposit_count += 1;
                self.direct_deposit_amount += stub.net_pay;
            }
            PaymentMethod::Check => {
                self.check_count += 1;
                self.check_amount += stub.net_pay;
            }
            PaymentMethod::Cash => {
                self.cash_count += 1;
                self.cash_amount += stub.net_pay;
            }
        }
    }

    /// Transitions the run to a new status, appending to the history log.
    pub fn transition(
        &mut self,
        to: PayRunStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> EngineResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(EngineError::InvalidStatusTransition {
                entity: "PayRun",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.history.push(StatusChange::new(self.status, to, actor, reason));
        self.status = to;
        Ok(())
    }
}
