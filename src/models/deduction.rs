//! Deduction and garnishment order models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The category of a deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// Health insurance premium.
    HealthInsurance,
    /// Dental insurance premium.
    DentalInsurance,
    /// Vision insurance premium.
    VisionInsurance,
    /// Traditional 401(k) contribution.
    Retirement401k,
    /// Roth retirement contribution.
    RothRetirement,
    /// Health savings account contribution.
    HealthSavings,
    /// Flexible spending account contribution.
    FlexibleSpending,
    /// Union dues.
    UnionDues,
    /// Charitable contribution.
    CharitableContribution,
    /// Employer loan repayment.
    LoanRepayment,
    /// Court-ordered garnishment; carries a [`GarnishmentOrder`].
    Garnishment,
    /// Anything else.
    Other,
}

/// How a deduction amount is calculated.
///
/// Graduated schedules and formulas are policy data, not engine logic, so
/// those variants carry an amount precomputed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum CalculationMethod {
    /// A literal dollar amount per pay period.
    Fixed(Decimal),
    /// A fraction of gross pay (e.g. 0.05 for 5%).
    PercentageOfGross(Decimal),
    /// A fraction of the running net value at the point the deduction
    /// is applied.
    PercentageOfNet(Decimal),
    /// A graduated-schedule amount, precomputed by the caller.
    Graduated(Decimal),
    /// A formula-derived amount, precomputed by the caller.
    Formula(Decimal),
}

/// When in the calculation order a deduction is applied.
///
/// A deduction is pre-tax or post-tax exclusively; statutory deductions
/// (the taxes themselves) are neither. The exclusivity invariant is
/// expressed by this enum rather than checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxTreatment {
    /// Applied before taxable income is calculated.
    PreTax,
    /// Applied after taxes, against net pay.
    PostTax,
    /// Legally mandated withholding computed by the tax engine.
    Statutory,
}

/// The legal category of a garnishment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarnishmentType {
    /// Child support order.
    ChildSupport,
    /// Spousal support order.
    SpousalSupport,
    /// Federal or state tax levy.
    TaxLevy,
    /// Defaulted student loan garnishment.
    StudentLoan,
    /// Commercial creditor garnishment.
    Creditor,
    /// Unspecified order type.
    Other,
}

impl GarnishmentType {
    /// Legal priority rank; lower ranks are withheld first.
    ///
    /// Support orders outrank tax levies, which outrank student loans,
    /// which outrank creditor garnishments.
    pub fn priority_rank(&self) -> u8 {
        match self {
            GarnishmentType::ChildSupport => 0,
            GarnishmentType::SpousalSupport => 1,
            GarnishmentType::TaxLevy => 2,
            GarnishmentType::StudentLoan => 3,
            GarnishmentType::Creditor => 4,
            GarnishmentType::Other => 5,
        }
    }
}

/// Legal metadata for a garnishment order.
///
/// One-to-one with a garnishment-type [`Deduction`]. All limit fields are
/// explicit options: `None` means "not specified", never a sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarnishmentOrder {
    /// The court or agency order number.
    pub order_number: String,
    /// The legal category of the order.
    pub garnishment_type: GarnishmentType,
    /// The authority that issued the order.
    pub issuing_authority: String,
    /// Explicit priority used to break ties between orders of the same
    /// type; lower is withheld first.
    pub priority: Option<u32>,
    /// Order-specific ceiling as a fraction of disposable income,
    /// overriding the type default when present.
    pub max_percentage: Option<Decimal>,
    /// A fixed per-period amount mandated by the order, used instead of
    /// the percentage ceiling when present.
    pub fixed_amount: Option<Decimal>,
    /// The remaining balance on the order; withholding never exceeds it.
    pub remaining_balance: Option<Decimal>,
}

/// A withholding rule instance for one caregiver.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CalculationMethod, Deduction, DeductionType, TaxTreatment};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let deduction = Deduction::new(
///     "cg_001",
///     DeductionType::Retirement401k,
///     CalculationMethod::PercentageOfGross(Decimal::from_str("0.05").unwrap()),
///     TaxTreatment::PreTax,
/// );
/// assert!(deduction.remaining_annual_limit().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier.
    pub id: Uuid,
    /// The caregiver this deduction applies to.
    pub caregiver_id: String,
    /// The category of the deduction.
    pub deduction_type: DeductionType,
    /// How the amount is calculated.
    pub method: CalculationMethod,
    /// Pre-tax, post-tax, or statutory.
    pub treatment: TaxTreatment,
    /// Optional annual cap on this deduction.
    pub yearly_limit: Option<Decimal>,
    /// Amount already withheld this year.
    pub year_to_date: Decimal,
    /// The garnishment order, for garnishment-type deductions.
    pub garnishment: Option<GarnishmentOrder>,
    /// Human-readable description.
    pub description: String,
}

impl Deduction {
    /// Creates a new deduction with no annual limit and zero YTD.
    pub fn new(
        caregiver_id: &str,
        deduction_type: DeductionType,
        method: CalculationMethod,
        treatment: TaxTreatment,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            caregiver_id: caregiver_id.to_string(),
            deduction_type,
            method,
            treatment,
            yearly_limit: None,
            year_to_date: Decimal::ZERO,
            garnishment: None,
            description: String::new(),
        }
    }

    /// Returns the headroom left under the annual limit, floored at zero,
    /// or `None` when no limit is configured.
    pub fn remaining_annual_limit(&self) -> Option<Decimal> {
        self.yearly_limit
            .map(|limit| (limit - self.year_to_date).max(Decimal::ZERO))
    }

    /// Returns true if this is a garnishment deduction.
    pub fn is_garnishment(&self) -> bool {
        self.deduction_type == DeductionType::Garnishment
    }
}
