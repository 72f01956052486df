//! Ordered deduction application.
//!
//! Deductions apply in three phases: pre-tax deductions reduce taxable
//! income, statutory withholding (the taxes) comes out next, and
//! post-tax deductions reduce what remains, with garnishments withheld
//! before voluntary post-tax deductions. Within the post-tax phase,
//! garnishment ceilings are computed against disposable income as it
//! stood before any garnishment was taken.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::garnishments::{garnishment_amount, sort_garnishments_by_priority};
use super::money::{clamp_non_negative, round_to_cents};
use crate::config::GarnishmentLimits;
use crate::models::{CalculationMethod, Deduction, DeductionType, TaxTreatment};

/// One deduction with its calculated per-period amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDeduction {
    /// The deduction this line item was calculated from.
    pub deduction_id: Uuid,
    /// The category of the deduction.
    pub deduction_type: DeductionType,
    /// Pre-tax, post-tax, or statutory.
    pub treatment: TaxTreatment,
    /// Human-readable description.
    pub description: String,
    /// The amount withheld this period.
    pub amount: Decimal,
}

/// The result of applying every deduction phase to a period's gross pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionBatch {
    /// Gross pay less pre-tax deductions.
    pub taxable_income: Decimal,
    /// Sum of pre-tax deduction amounts.
    pub pre_tax_total: Decimal,
    /// Sum of statutory withholding amounts.
    pub statutory_total: Decimal,
    /// Sum of post-tax deduction amounts, garnishments included.
    pub post_tax_total: Decimal,
    /// What the caregiver takes home.
    pub net_pay: Decimal,
    /// Every applied deduction, in application order.
    pub items: Vec<AppliedDeduction>,
}

/// Calculates the amount one deduction withholds this period.
///
/// Percentage-of-gross deductions always use the original gross pay;
/// percentage-of-net deductions use the running value the caller passes
/// as `net`. The result is capped by the deduction's remaining annual
/// limit and floored at zero.
pub fn deduction_amount(gross_pay: Decimal, net: Decimal, deduction: &Deduction) -> Decimal {
    let raw = match deduction.method {
        CalculationMethod::Fixed(amount) => amount,
        CalculationMethod::PercentageOfGross(fraction) => gross_pay * fraction,
        CalculationMethod::PercentageOfNet(fraction) => net * fraction,
        CalculationMethod::Graduated(amount) => amount,
        CalculationMethod::Formula(amount) => amount,
    };
    let mut amount = round_to_cents(raw);
    if let Some(remaining) = deduction.remaining_annual_limit() {
        amount = amount.min(remaining);
    }
    clamp_non_negative(amount)
}

/// Applies all deduction phases in order.
///
/// `statutory_amounts` are the already-computed tax withholding figures;
/// the tax engine produces them between the pre-tax and post-tax phases.
/// No phase can drive its running value negative: each amount is capped
/// by what is left when its turn comes.
pub fn calculate_all_deductions(
    gross_pay: Decimal,
    pre_tax: &[Deduction],
    statutory_amounts: &[Decimal],
    post_tax: &[Deduction],
    limits: &GarnishmentLimits,
) -> DeductionBatch {
    let mut items = Vec::new();

    // Phase 1: pre-tax, reducing taxable income.
    let mut taxable_income = clamp_non_negative(gross_pay);
    let mut pre_tax_total = Decimal::ZERO;
    for deduction in pre_tax {
        let amount = deduction_amount(gross_pay, taxable_income, deduction).min(taxable_income);
        taxable_income -= amount;
        pre_tax_total += amount;
        items.push(applied(deduction, amount));
    }

    // Phase 2: statutory withholding.
    let statutory_total: Decimal = statutory_amounts
        .iter()
        .map(|a| clamp_non_negative(*a))
        .sum();
    let disposable_income = clamp_non_negative(taxable_income - statutory_total);

    // Phase 3: post-tax, garnishments first in legal priority order.
    let mut net_pay = disposable_income;
    let mut post_tax_total = Decimal::ZERO;

    let mut garnishments: Vec<&Deduction> =
        post_tax.iter().filter(|d| d.is_garnishment()).collect();
    sort_garnishments_by_priority(&mut garnishments);
    for deduction in garnishments {
        let amount = garnishment_amount(disposable_income, deduction, limits).min(net_pay);
        net_pay -= amount;
        post_tax_total += amount;
        items.push(applied(deduction, amount));
    }

    for deduction in post_tax.iter().filter(|d| !d.is_garnishment()) {
        let amount = deduction_amount(gross_pay, net_pay, deduction).min(net_pay);
        net_pay -= amount;
        post_tax_total += amount;
        items.push(applied(deduction, amount));
    }

    DeductionBatch {
        taxable_income,
        pre_tax_total,
        statutory_total,
        post_tax_total,
        net_pay,
        items,
    }
}

fn applied(deduction: &Deduction, amount: Decimal) -> AppliedDeduction {
    AppliedDeduction {
        deduction_id: deduction.id,
        deduction_type: deduction.deduction_type,
        treatment: deduction.treatment,
        description: deduction.description.clone(),
        amount,
    }
}
