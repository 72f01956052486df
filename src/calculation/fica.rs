//! FICA withholding: Social Security and Medicare.
//!
//! Social Security is capped at the annual wage base; Medicare is
//! uncapped, with an additional surtax above the high-earner threshold.
//! All three are computed against year-to-date gross so boundary periods
//! withhold only the taxable portion.

use rust_decimal::Decimal;

use super::money::{clamp_non_negative, round_to_cents};
use crate::config::FicaConfig;

/// Social Security withholding for one pay period.
///
/// Only wages up to the annual wage base are taxed; once year-to-date
/// gross crosses the base, withholding stops mid-period.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::social_security_tax;
/// use payroll_engine::config::FicaConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let fica = FicaConfig {
///     social_security_rate: Decimal::from_str("0.062").unwrap(),
///     social_security_wage_base: Decimal::from(168_600),
///     medicare_rate: Decimal::from_str("0.0145").unwrap(),
///     additional_medicare_rate: Decimal::from_str("0.009").unwrap(),
///     additional_medicare_threshold: Decimal::from(200_000),
/// };
/// // Only $600 of this $1000 period is under the wage base.
/// let tax = social_security_tax(Decimal::from(1000), Decimal::from(168_000), &fica);
/// assert_eq!(tax, Decimal::from_str("37.20").unwrap());
/// ```
pub fn social_security_tax(gross_pay: Decimal, ytd_gross: Decimal, fica: &FicaConfig) -> Decimal {
    if gross_pay <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let room = clamp_non_negative(fica.social_security_wage_base - clamp_non_negative(ytd_gross));
    let taxable = gross_pay.min(room);
    round_to_cents(taxable * fica.social_security_rate)
}

/// Medicare withholding for one pay period. Uncapped.
pub fn medicare_tax(gross_pay: Decimal, fica: &FicaConfig) -> Decimal {
    if gross_pay <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_to_cents(gross_pay * fica.medicare_rate)
}

/// Additional Medicare withholding above the high-earner threshold.
///
/// Only the portion of this period's wages above the threshold is
/// surtaxed; a period that straddles the threshold is taxed on the
/// excess alone.
pub fn additional_medicare_tax(
    gross_pay: Decimal,
    ytd_gross: Decimal,
    fica: &FicaConfig,
) -> Decimal {
    if gross_pay <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ytd = clamp_non_negative(ytd_gross);
    if ytd >= fica.additional_medicare_threshold {
        return round_to_cents(gross_pay * fica.additional_medicare_rate);
    }
    let excess = ytd + gross_pay - fica.additional_medicare_threshold;
    if excess > Decimal::ZERO {
        round_to_cents(excess * fica.additional_medicare_rate)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fica_2024() -> FicaConfig {
        FicaConfig {
            social_security_rate: dec("0.062"),
            social_security_wage_base: dec("168600"),
            medicare_rate: dec("0.0145"),
            additional_medicare_rate: dec("0.009"),
            additional_medicare_threshold: dec("200000"),
        }
    }

    // ==========================================================================
    // Social Security
    // ==========================================================================

    #[test]
    fn test_social_security_under_wage_base() {
        let tax = social_security_tax(dec("1000"), dec("50000"), &fica_2024());
        assert_eq!(tax, dec("62.00"));
    }

    #[test]
    fn test_social_security_straddles_wage_base() {
        // $600 of room remains under the $168,600 base.
        let tax = social_security_tax(dec("1000"), dec("168000"), &fica_2024());
        assert_eq!(tax, dec("37.20"));
    }

    #[test]
    fn test_social_security_past_wage_base_is_zero() {
        let tax = social_security_tax(dec("1000"), dec("168600"), &fica_2024());
        assert_eq!(tax, Decimal::ZERO);
        let tax = social_security_tax(dec("1000"), dec("250000"), &fica_2024());
        assert_eq!(tax, Decimal::ZERO);
    }

    #[test]
    fn test_social_security_negative_ytd_treated_as_zero() {
        let tax = social_security_tax(dec("1000"), dec("-500"), &fica_2024());
        assert_eq!(tax, dec("62.00"));
    }

    #[test]
    fn test_social_security_zero_gross() {
        assert_eq!(social_security_tax(Decimal::ZERO, dec("50000"), &fica_2024()), Decimal::ZERO);
    }

    // ==========================================================================
    // Medicare
    // ==========================================================================

    #[test]
    fn test_medicare_uncapped() {
        assert_eq!(medicare_tax(dec("1000"), &fica_2024()), dec("14.50"));
        // Still withheld far past the Social Security wage base.
        assert_eq!(medicare_tax(dec("10000"), &fica_2024()), dec("145.00"));
    }

    #[test]
    fn test_medicare_zero_gross() {
        assert_eq!(medicare_tax(Decimal::ZERO, &fica_2024()), Decimal::ZERO);
    }

    // ==========================================================================
    // Additional Medicare
    // ==========================================================================

    #[test]
    fn test_additional_medicare_under_threshold() {
        let tax = additional_medicare_tax(dec("5000"), dec("150000"), &fica_2024());
        assert_eq!(tax, Decimal::ZERO);
    }

    #[test]
    fn test_additional_medicare_straddles_threshold() {
        // YTD 198,000 + 5,000 puts 3,000 over the threshold.
        let tax = additional_medicare_tax(dec("5000"), dec("198000"), &fica_2024());
        assert_eq!(tax, dec("27.00"));
    }

    #[test]
    fn test_additional_medicare_fully_above_threshold() {
        let tax = additional_medicare_tax(dec("5000"), dec("250000"), &fica_2024());
        assert_eq!(tax, dec("45.00"));
    }

    #[test]
    fn test_additional_medicare_exactly_at_threshold() {
        let tax = additional_medicare_tax(dec("5000"), dec("200000"), &fica_2024());
        assert_eq!(tax, dec("45.00"));
    }

    #[test]
    fn test_additional_medicare_continuous_at_boundary() {
        // Withholding just below and just above the straddle point differs
        // by only the surtax on the extra dollar.
        let just_under = additional_medicare_tax(dec("1000"), dec("199000"), &fica_2024());
        let just_over = additional_medicare_tax(dec("1001"), dec("199000"), &fica_2024());
        assert_eq!(just_under, Decimal::ZERO);
        assert_eq!(just_over, dec("0.01"));
    }
}
