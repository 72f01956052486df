//! Combined tax withholding for one pay period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::federal_tax::federal_income_tax;
use super::fica::{additional_medicare_tax, medicare_tax, social_security_tax};
use super::state_tax::{local_income_tax, state_income_tax};
use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{PayPeriodType, TaxConfiguration};

/// Itemized tax withholding for one pay period.
///
/// `total` is always the exact sum of the itemized components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxWithholding {
    /// Federal income tax.
    pub federal: Decimal,
    /// State income tax.
    pub state: Decimal,
    /// Local-jurisdiction income tax.
    pub local: Decimal,
    /// Social Security.
    pub social_security: Decimal,
    /// Medicare.
    pub medicare: Decimal,
    /// Additional Medicare surtax.
    pub additional_medicare: Decimal,
    /// Sum of all components.
    pub total: Decimal,
}

/// Computes every withholding component for one period of wages.
///
/// Income taxes and FICA are all computed on the same taxable wage
/// figure; the caller applies pre-tax deductions before calling. The
/// year-to-date gross drives the Social Security wage-base cap and the
/// additional Medicare threshold.
pub fn calculate_all_taxes(
    taxable_income: Decimal,
    pay_period_type: PayPeriodType,
    tax_config: &TaxConfiguration,
    ytd_gross: Decimal,
    tables: &TaxTables,
) -> EngineResult<TaxWithholding> {
    let federal = federal_income_tax(taxable_income, pay_period_type, tax_config, tables)?;
    let state = state_income_tax(taxable_income, &tax_config.state_code, tax_config, tables)?;
    let local = local_income_tax(taxable_income, tax_config);
    let social_security = social_security_tax(taxable_income, ytd_gross, tables.fica());
    let medicare = medicare_tax(taxable_income, tables.fica());
    let additional_medicare = additional_medicare_tax(taxable_income, ytd_gross, tables.fica());
    Ok(TaxWithholding {
        federal,
        state,
        local,
        social_security,
        medicare,
        additional_medicare,
        total: federal + state + local + social_security + medicare + additional_medicare,
    })
}
