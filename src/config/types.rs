//! Configuration types for payroll tax tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML tax-table files. The engine treats these as
//! data: it applies whatever brackets and rates it is given and makes no
//! claim that they are correct for any particular year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::GarnishmentType;

/// Federal filing status used to select a bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single filer.
    Single,
    /// Married filing jointly.
    MarriedFilingJointly,
    /// Married filing separately.
    MarriedFilingSeparately,
    /// Head of household.
    HeadOfHousehold,
}

impl FilingStatus {
    /// Returns the snake_case name used in configuration files and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedFilingJointly => "married_filing_jointly",
            FilingStatus::MarriedFilingSeparately => "married_filing_separately",
            FilingStatus::HeadOfHousehold => "head_of_household",
        }
    }
}

/// One marginal tax bracket.
///
/// Brackets are ascending; the top bracket has no upper bound.
///
/// # Example
///
/// ```
/// use payroll_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let bracket = TaxBracket {
///     up_to: Some(Decimal::from_str("11600").unwrap()),
///     rate: Decimal::from_str("0.10").unwrap(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The upper bound of annualized income covered by this bracket,
    /// or `None` for the top bracket.
    pub up_to: Option<Decimal>,
    /// The marginal rate applied within this bracket.
    pub rate: Decimal,
}

/// Supplemental-wage withholding rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementalRates {
    /// The flat rate applied to supplemental wages (e.g. 0.22).
    pub flat_rate: Decimal,
    /// The rate applied to the portion of a single payment above the
    /// high-earner threshold (e.g. 0.37).
    pub high_earner_rate: Decimal,
    /// The single-payment threshold above which the high-earner rate
    /// applies (e.g. 1,000,000).
    pub high_earner_threshold: Decimal,
}

/// Federal income tax tables for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalTaxTables {
    /// The tax year these tables describe.
    pub year: i32,
    /// Marginal bracket tables keyed by filing status.
    pub brackets: HashMap<FilingStatus, Vec<TaxBracket>>,
    /// Supplemental-wage withholding rates.
    pub supplemental: SupplementalRates,
}

/// FICA (Social Security and Medicare) parameters for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaConfig {
    /// The Social Security withholding rate (e.g. 0.062).
    pub social_security_rate: Decimal,
    /// The annual Social Security wage base (e.g. 168600).
    pub social_security_wage_base: Decimal,
    /// The Medicare withholding rate (e.g. 0.0145).
    pub medicare_rate: Decimal,
    /// The additional Medicare rate on high earners (e.g. 0.009).
    pub additional_medicare_rate: Decimal,
    /// The annual wage threshold above which the additional Medicare
    /// rate applies (e.g. 200000).
    pub additional_medicare_threshold: Decimal,
}

/// Flat state withholding rates keyed by two-letter state code.
///
/// States with no income tax appear with a rate of zero; a missing state
/// is a configuration error, not an implicit zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxTables {
    /// Map of state code (e.g. "CA") to flat withholding rate.
    pub rates: HashMap<String, Decimal>,
}

/// Default percentage-of-disposable-income ceilings by garnishment type.
///
/// An individual [`GarnishmentOrder`](crate::models::GarnishmentOrder) may
/// carry its own `max_percentage`, which overrides these defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarnishmentLimits {
    /// Ceiling for child support orders (e.g. 0.50).
    pub child_support: Decimal,
    /// Ceiling for spousal support orders (e.g. 0.50).
    pub spousal_support: Decimal,
    /// Ceiling for tax levies (may reach 1.00).
    pub tax_levy: Decimal,
    /// Ceiling for student loan garnishments (e.g. 0.15).
    pub student_loan: Decimal,
    /// Ceiling for creditor garnishments (e.g. 0.25).
    pub creditor: Decimal,
    /// Ceiling applied to any garnishment type without its own entry.
    pub default_limit: Decimal,
}

impl GarnishmentLimits {
    /// Returns the default disposable-income ceiling for a garnishment type.
    pub fn ceiling_for(&self, garnishment_type: GarnishmentType) -> Decimal {
        match garnishment_type {
            GarnishmentType::ChildSupport => self.child_support,
            GarnishmentType::SpousalSupport => self.spousal_support,
            GarnishmentType::TaxLevy => self.tax_levy,
            GarnishmentType::StudentLoan => self.student_loan,
            GarnishmentType::Creditor => self.creditor,
            GarnishmentType::Other => self.default_limit,
        }
    }
}

/// The complete set of tax tables loaded from a configuration directory.
///
/// This struct aggregates all configuration loaded from the YAML files in a
/// tax-year configuration directory.
#[derive(Debug, Clone)]
pub struct TaxTables {
    /// Federal income tax tables.
    federal: FederalTaxTables,
    /// FICA parameters.
    fica: FicaConfig,
    /// State withholding rates.
    states: StateTaxTables,
    /// Garnishment disposable-income ceilings.
    garnishments: GarnishmentLimits,
}

impl TaxTables {
    /// Creates a new TaxTables from its component parts.
    ///
    /// Bracket tables are sorted ascending by upper bound so the marginal
    /// walk in the federal tax engine can rely on ordering; the unbounded
    /// top bracket sorts last.
    pub fn new(
        federal: FederalTaxTables,
        fica: FicaConfig,
        states: StateTaxTables,
        garnishments: GarnishmentLimits,
    ) -> Self {
        let mut federal = federal;
        for table in federal.brackets.values_mut() {
            table.sort_by(|a, b| match (a.up_to, b.up_to) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
        Self {
            federal,
            fica,
            states,
            garnishments,
        }
    }

    /// Returns the federal tax tables.
    pub fn federal(&self) -> &FederalTaxTables {
        &self.federal
    }

    /// Returns the FICA parameters.
    pub fn fica(&self) -> &FicaConfig {
        &self.fica
    }

    /// Returns the state withholding tables.
    pub fn states(&self) -> &StateTaxTables {
        &self.states
    }

    /// Returns the garnishment ceilings.
    pub fn garnishments(&self) -> &GarnishmentLimits {
        &self.garnishments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_limits() -> GarnishmentLimits {
        GarnishmentLimits {
            child_support: dec("0.50"),
            spousal_support: dec("0.50"),
            tax_levy: dec("1.00"),
            student_loan: dec("0.15"),
            creditor: dec("0.25"),
            default_limit: dec("0.25"),
        }
    }

    #[test]
    fn test_filing_status_serialization() {
        assert_eq!(
            serde_json::to_string(&FilingStatus::Single).unwrap(),
            "\"single\""
        );
        assert_eq!(
            serde_json::to_string(&FilingStatus::MarriedFilingJointly).unwrap(),
            "\"married_filing_jointly\""
        );
        assert_eq!(
            serde_json::to_string(&FilingStatus::HeadOfHousehold).unwrap(),
            "\"head_of_household\""
        );
    }

    #[test]
    fn test_filing_status_as_str_matches_serde() {
        let json = serde_json::to_string(&FilingStatus::MarriedFilingSeparately).unwrap();
        assert_eq!(json, format!("\"{}\"", FilingStatus::MarriedFilingSeparately.as_str()));
    }

    #[test]
    fn test_ceiling_for_each_type() {
        let limits = sample_limits();
        assert_eq!(limits.ceiling_for(GarnishmentType::ChildSupport), dec("0.50"));
        assert_eq!(limits.ceiling_for(GarnishmentType::SpousalSupport), dec("0.50"));
        assert_eq!(limits.ceiling_for(GarnishmentType::TaxLevy), dec("1.00"));
        assert_eq!(limits.ceiling_for(GarnishmentType::StudentLoan), dec("0.15"));
        assert_eq!(limits.ceiling_for(GarnishmentType::Creditor), dec("0.25"));
        assert_eq!(limits.ceiling_for(GarnishmentType::Other), dec("0.25"));
    }

    #[test]
    fn test_new_sorts_brackets_with_unbounded_last() {
        let mut brackets = HashMap::new();
        brackets.insert(
            FilingStatus::Single,
            vec![
                TaxBracket { up_to: None, rate: dec("0.37") },
                TaxBracket { up_to: Some(dec("47150")), rate: dec("0.12") },
                TaxBracket { up_to: Some(dec("11600")), rate: dec("0.10") },
            ],
        );
        let federal = FederalTaxTables {
            year: 2024,
            brackets,
            supplemental: SupplementalRates {
                flat_rate: dec("0.22"),
                high_earner_rate: dec("0.37"),
                high_earner_threshold: dec("1000000"),
            },
        };
        let fica = FicaConfig {
            social_security_rate: dec("0.062"),
            social_security_wage_base: dec("168600"),
            medicare_rate: dec("0.0145"),
            additional_medicare_rate: dec("0.009"),
            additional_medicare_threshold: dec("200000"),
        };
        let states = StateTaxTables {
            rates: HashMap::new(),
        };

        let tables = TaxTables::new(federal, fica, states, sample_limits());
        let sorted = &tables.federal().brackets[&FilingStatus::Single];
        assert_eq!(sorted[0].up_to, Some(dec("11600")));
        assert_eq!(sorted[1].up_to, Some(dec("47150")));
        assert_eq!(sorted[2].up_to, None);
    }

    #[test]
    fn test_tax_bracket_deserialization() {
        let yaml = r#"
up_to: "47150"
rate: "0.12"
"#;
        let bracket: TaxBracket = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bracket.up_to, Some(dec("47150")));
        assert_eq!(bracket.rate, dec("0.12"));
    }

    #[test]
    fn test_top_bracket_deserializes_without_bound() {
        let yaml = r#"
rate: "0.37"
"#;
        let bracket: TaxBracket = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bracket.up_to, None);
    }
}
