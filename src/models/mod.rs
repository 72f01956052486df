//! Domain models for the payroll engine.
//!
//! This module contains the pay period, time sheet, pay run, pay stub,
//! deduction and tax configuration entities, together with their lifecycle
//! state machines and append-only status history logs.

mod deduction;
mod discrepancy;
mod pay_period;
mod pay_run;
mod pay_stub;
mod status;
mod tax_configuration;
mod time_sheet;

pub use deduction::{
    CalculationMethod, Deduction, DeductionType, GarnishmentOrder, GarnishmentType, TaxTreatment,
};
pub use discrepancy::{DiscrepancyFlag, DiscrepancyKind, DiscrepancySeverity};
pub use pay_period::{PayPeriod, PayPeriodStatus, PayPeriodType};
pub use pay_run::{PayRun, PayRunStatus};
pub use pay_stub::{PayStub, PayStubStatus, PaymentMethod, YearToDate};
pub use status::StatusChange;
pub use tax_configuration::TaxConfiguration;
pub use time_sheet::{
    Adjustment, AdjustmentType, AppliedRateMultiplier, CategorySummary, CategoryTotal,
    RateMultiplierType, TimeSheet, TimeSheetEntry, TimeSheetStatus,
};
