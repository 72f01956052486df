//! State and local income tax withholding.
//!
//! State withholding uses a flat rate per state code from the loaded
//! tables. No-income-tax states are configured with an explicit zero
//! rate; an unknown state code is a configuration error.

use rust_decimal::Decimal;

use super::money::{clamp_non_negative, round_to_cents};
use crate::config::TaxTables;
use crate::error::{EngineError, EngineResult};
use crate::models::TaxConfiguration;

/// State income tax withholding for one pay period.
pub fn state_income_tax(
    gross_pay: Decimal,
    state_code: &str,
    tax_config: &TaxConfiguration,
    tables: &TaxTables,
) -> EngineResult<Decimal> {
    if tax_config.state_exempt || gross_pay <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let rate = tables
        .states()
        .rates
        .get(state_code)
        .copied()
        .ok_or_else(|| EngineError::StateRateNotFound {
            state: state_code.to_string(),
        })?;
    Ok(clamp_non_negative(round_to_cents(
        gross_pay * rate + tax_config.state_extra_withholding,
    )))
}

/// Local-jurisdiction income tax withholding, if the caregiver's
/// elections carry a local rate.
pub fn local_income_tax(gross_pay: Decimal, tax_config: &TaxConfiguration) -> Decimal {
    match tax_config.local_tax_rate {
        Some(rate) if gross_pay > Decimal::ZERO => round_to_cents(gross_pay * rate),
        _ => Decimal::ZERO,
    }
}
