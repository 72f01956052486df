//! Federal income tax withholding.
//!
//! Regular wages follow the annualized percentage method: apply the W-4
//! adjustments per pay period, annualize, walk the marginal brackets,
//! de-annualize and add any flat extra withholding. Supplemental wages
//! (bonuses) are withheld either at the flat rate or by the aggregate
//! method.

use rust_decimal::Decimal;

use super::money::{clamp_non_negative, round_to_cents};
use crate::config::TaxTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriodType, TaxConfiguration};

/// Inputs the aggregate supplemental method needs about the regular
/// paycheck the bonus is paid alongside.
#[derive(Debug, Clone, Copy)]
pub struct AggregateParams<'a> {
    /// Regular (non-supplemental) gross pay for the same period.
    pub regular_gross_pay: Decimal,
    /// Pay period frequency.
    pub pay_period_type: PayPeriodType,
    /// The caregiver's withholding elections.
    pub tax_config: &'a TaxConfiguration,
}

/// Federal income tax withholding for one period of regular wages.
///
/// Applies the W-4 per-period adjustments (other income added, dependent
/// credit and extra deductions subtracted), annualizes the result, walks
/// the marginal brackets for the filing status, de-annualizes, and adds
/// the flat extra withholding. An exempt caregiver or non-positive gross
/// withholds nothing.
pub fn federal_income_tax(
    gross_pay: Decimal,
    pay_period_type: PayPeriodType,
    tax_config: &TaxConfiguration,
    tables: &TaxTables,
) -> EngineResult<Decimal> {
    if tax_config.federal_exempt || gross_pay <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let periods = pay_period_type.periods_per_year();
    let adjusted = clamp_non_negative(
        gross_pay + tax_config.other_income / periods
            - tax_config.dependent_credit / periods
            - tax_config.deductions / periods,
    );
    let annual_income = adjusted * periods;
    let annual_tax = marginal_tax(annual_income, tax_config, tables)?;
    Ok(clamp_non_negative(round_to_cents(
        annual_tax / periods + tax_config.extra_withholding,
    )))
}

/// Walks the marginal brackets for an annualized income.
fn marginal_tax(
    annual_income: Decimal,
    tax_config: &TaxConfiguration,
    tables: &TaxTables,
) -> EngineResult<Decimal> {
    let brackets = tables
        .federal()
        .brackets
        .get(&tax_config.filing_status)
        .ok_or_else(|| EngineError::BracketTableNotFound {
            filing_status: tax_config.filing_status.as_str().to_string(),
        })?;

    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for bracket in brackets {
        let upper = match bracket.up_to {
            Some(up_to) => annual_income.min(up_to),
            None => annual_income,
        };
        if upper > lower {
            tax += (upper - lower) * bracket.rate;
        }
        match bracket.up_to {
            Some(up_to) if annual_income > up_to => lower = up_to,
            _ => break,
        }
    }
    Ok(tax)
}

/// Federal withholding on a supplemental payment (bonus, retro pay).
///
/// With `use_flat_rate`, the payment is withheld at the flat supplemental
/// rate, except that the portion of a single payment above the
/// high-earner threshold is withheld at the high-earner rate instead.
/// Otherwise the aggregate method applies: withholding is the difference
/// between the regular-method tax on (regular + supplemental) and on
/// regular wages alone, clamped to `[0, supplemental]`. The aggregate
/// method requires [`AggregateParams`].
pub fn supplemental_withholding(
    supplemental_pay: Decimal,
    use_flat_rate: bool,
    aggregate: Option<AggregateParams<'_>>,
    tables: &TaxTables,
) -> EngineResult<Decimal> {
    if supplemental_pay <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if use_flat_rate {
        let rates = &tables.federal().supplemental;
        let excess = clamp_non_negative(supplemental_pay - rates.high_earner_threshold);
        let at_flat = supplemental_pay - excess;
        return Ok(round_to_cents(
            at_flat * rates.flat_rate + excess * rates.high_earner_rate,
        ));
    }
    let params = aggregate.ok_or(EngineError::MissingAggregateParams)?;
    let combined = federal_income_tax(
        params.regular_gross_pay + supplemental_pay,
        params.pay_period_type,
        params.tax_config,
        tables,
    )?;
    let regular_only = federal_income_tax(
        params.regular_gross_pay,
        params.pay_period_type,
        params.tax_config,
        tables,
    )?;
    Ok(clamp_non_negative(combined - regular_only).min(supplemental_pay))
}
