//! Per-caregiver tax withholding elections.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FilingStatus;

/// W-4-style withholding elections for one caregiver.
///
/// At most one configuration is effective for a caregiver on any date;
/// [`TaxConfiguration::effective_on`] selects it.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TaxConfiguration;
/// use payroll_engine::config::FilingStatus;
/// use chrono::NaiveDate;
///
/// let config = TaxConfiguration::new(
///     "cg_001",
///     FilingStatus::Single,
///     "CA",
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// );
/// assert!(config.is_effective_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfiguration {
    /// The caregiver these elections belong to.
    pub caregiver_id: String,
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Annual dependent credit claimed (W-4 step 3).
    pub dependent_credit: Decimal,
    /// Annual other income reported (W-4 step 4a).
    pub other_income: Decimal,
    /// Annual deductions claimed beyond the standard deduction (W-4 step 4b).
    pub deductions: Decimal,
    /// Flat extra federal withholding per pay period (W-4 step 4c).
    pub extra_withholding: Decimal,
    /// Exempt from federal income tax withholding.
    pub federal_exempt: bool,
    /// Two-letter state code for state withholding.
    pub state_code: String,
    /// Exempt from state income tax withholding.
    pub state_exempt: bool,
    /// Flat extra state withholding per pay period.
    pub state_extra_withholding: Decimal,
    /// Optional flat local-jurisdiction tax rate.
    pub local_tax_rate: Option<Decimal>,
    /// First date these elections are effective (inclusive).
    pub effective_from: NaiveDate,
    /// Last date these elections are effective (inclusive), or open-ended.
    pub effective_to: Option<NaiveDate>,
}

impl TaxConfiguration {
    /// Creates a configuration with zeroed elections, effective from the
    /// given date with no end date.
    pub fn new(
        caregiver_id: &str,
        filing_status: FilingStatus,
        state_code: &str,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            caregiver_id: caregiver_id.to_string(),
            filing_status,
            dependent_credit: Decimal::ZERO,
            other_income: Decimal::ZERO,
            deductions: Decimal::ZERO,
            extra_withholding: Decimal::ZERO,
            federal_exempt: false,
            state_code: state_code.to_string(),
            state_exempt: false,
            state_extra_withholding: Decimal::ZERO,
            local_tax_rate: None,
            effective_from,
            effective_to: None,
        }
    }

    /// Returns true if these elections are effective on the given date.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|end| date <= end)
    }

    /// Selects the configuration effective on a date from a caregiver's
    /// configurations, preferring the most recent `effective_from` when
    /// ranges overlap.
    pub fn effective_on(configs: &[TaxConfiguration], date: NaiveDate) -> Option<&TaxConfiguration> {
        configs
            .iter()
            .filter(|c| c.is_effective_on(date))
            .max_by_key(|c| c.effective_from)
    }
}
