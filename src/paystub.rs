//! Pay stub calculation: the full gross-to-net pipeline for one
//! approved time sheet.
//!
//! Order of operations: gross pay from the compiled sheet, pre-tax
//! deductions to reach taxable income, every tax on that figure, then
//! post-tax deductions (garnishments first) against what remains. The
//! result is a snapshot: nothing on a calculated stub is ever edited,
//! only voided and replaced.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculation::{calculate_all_deductions, calculate_all_taxes};
use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{
    Deduction, PayPeriodType, PayStub, PayStubStatus, PaymentMethod, TaxConfiguration,
    TaxTreatment, TimeSheet, YearToDate,
};
use uuid::Uuid;

/// Calculates a pay stub for one time sheet.
///
/// `prior_ytd` holds the caregiver's year-to-date totals before this
/// stub; its gross figure drives the Social Security wage-base cap and
/// the additional Medicare threshold. The returned stub is in
/// `Calculated` status with the year-to-date rollups already including
/// this period.
pub fn calculate_pay_stub(
    time_sheet: &TimeSheet,
    pay_period_type: PayPeriodType,
    tax_config: &TaxConfiguration,
    deductions: &[Deduction],
    prior_ytd: &YearToDate,
    payment_method: PaymentMethod,
    tables: &TaxTables,
) -> EngineResult<PayStub> {
    let gross_pay = time_sheet.total_gross_pay();
    let pre_tax: Vec<Deduction> = deductions
        .iter()
        .filter(|d| d.treatment == TaxTreatment::PreTax)
        .cloned()
        .collect();
    let post_tax: Vec<Deduction> = deductions
        .iter()
        .filter(|d| d.treatment == TaxTreatment::PostTax)
        .cloned()
        .collect();

    // First pass establishes taxable income; taxes are computed on it and
    // fed back as the statutory phase of the full fold.
    let pre_tax_only =
        calculate_all_deductions(gross_pay, &pre_tax, &[], &[], tables.garnishments());
    let taxes = calculate_all_taxes(
        pre_tax_only.taxable_income,
        pay_period_type,
        tax_config,
        prior_ytd.gross_pay,
        tables,
    )?;
    let statutory = [
        taxes.federal,
        taxes.state,
        taxes.local,
        taxes.social_security,
        taxes.medicare,
        taxes.additional_medicare,
    ];
    let batch =
        calculate_all_deductions(gross_pay, &pre_tax, &statutory, &post_tax, tables.garnishments());

    debug!(
        time_sheet_id = %time_sheet.id,
        %gross_pay,
        taxable_income = %batch.taxable_income,
        total_taxes = %taxes.total,
        net_pay = %batch.net_pay,
        "pay stub calculated"
    );

    let mut stub = PayStub {
        id: Uuid::new_v4(),
        caregiver_id: time_sheet.caregiver_id.clone(),
        pay_run_id: None,
        time_sheet_id: time_sheet.id,
        pay_period_id: time_sheet.pay_period_id,
        regular_hours: time_sheet.summary.regular.hours,
        overtime_hours: time_sheet.summary.overtime.hours,
        double_time_hours: time_sheet.summary.double_time.hours,
        other_hours: time_sheet.summary.pto.hours
            + time_sheet.summary.holiday.hours
            + time_sheet.summary.sick.hours
            + time_sheet.summary.other.hours,
        gross_pay,
        taxable_income: batch.taxable_income,
        taxes,
        deductions: batch.items,
        pre_tax_total: batch.pre_tax_total,
        post_tax_total: batch.post_tax_total,
        net_pay: batch.net_pay,
        ytd: YearToDate {
            gross_pay: prior_ytd.gross_pay + gross_pay,
            net_pay: prior_ytd.net_pay + batch.net_pay,
            total_taxes: prior_ytd.total_taxes + taxes.total,
            total_deductions: prior_ytd.total_deductions
                + batch.pre_tax_total
                + batch.post_tax_total,
        },
        payment_method,
        is_void: false,
        status: PayStubStatus::Draft,
        history: Vec::new(),
    };
    stub.transition(PayStubStatus::Calculated, "system", None)?;
    Ok(stub)
}
