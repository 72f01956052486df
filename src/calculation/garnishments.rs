//! Garnishment withholding against disposable income.
//!
//! Each order withholds up to a ceiling expressed as a fraction of
//! disposable income (gross less statutory withholding). The ceiling
//! comes from the order itself when it carries a `max_percentage`, or
//! from the configured per-type defaults otherwise. A fixed per-period
//! amount mandated by the order is still capped by the ceiling and by
//! the order's remaining balance.

use rust_decimal::Decimal;

use super::money::{clamp_non_negative, round_to_cents};
use crate::config::GarnishmentLimits;
use crate::models::{Deduction, GarnishmentType};

/// Computes the withholding for one garnishment order.
///
/// `disposable_income` is the caregiver's disposable income for the
/// period before any garnishment is taken; ceilings are always computed
/// against this figure, not against what earlier orders left behind.
pub fn garnishment_amount(
    disposable_income: Decimal,
    deduction: &Deduction,
    limits: &GarnishmentLimits,
) -> Decimal {
    if disposable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let order = deduction.garnishment.as_ref();
    let garnishment_type = order
        .map(|o| o.garnishment_type)
        .unwrap_or(GarnishmentType::Other);
    let ceiling_fraction = order
        .and_then(|o| o.max_percentage)
        .unwrap_or_else(|| limits.ceiling_for(garnishment_type));
    let ceiling = round_to_cents(disposable_income * ceiling_fraction);

    let mut amount = match order.and_then(|o| o.fixed_amount) {
        Some(fixed) => fixed.min(ceiling),
        None => ceiling,
    };
    if let Some(balance) = order.and_then(|o| o.remaining_balance) {
        amount = amount.min(balance);
    }
    clamp_non_negative(round_to_cents(amount))
}

/// Sorts garnishment deductions into legal withholding order.
///
/// Orders are ranked by type (support first, then levies, student loans,
/// creditors), with the order-level priority field breaking ties within a
/// type; orders without a priority sort last among their type.
pub fn sort_garnishments_by_priority(garnishments: &mut [&Deduction]) {
    garnishments.sort_by_key(|d| {
        let order = d.garnishment.as_ref();
        let rank = order
            .map(|o| o.garnishment_type.priority_rank())
            .unwrap_or(GarnishmentType::Other.priority_rank());
        let tie_break = order.and_then(|o| o.priority).unwrap_or(u32::MAX);
        (rank, tie_break)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationMethod, DeductionType, GarnishmentOrder, TaxTreatment};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn limits() -> GarnishmentLimits {
        GarnishmentLimits {
            child_support: dec("0.50"),
            spousal_support: dec("0.50"),
            tax_levy: dec("1.00"),
            student_loan: dec("0.15"),
            creditor: dec("0.25"),
            default_limit: dec("0.25"),
        }
    }

    fn garnishment(
        garnishment_type: GarnishmentType,
        max_percentage: Option<&str>,
        fixed_amount: Option<&str>,
        remaining_balance: Option<&str>,
    ) -> Deduction {
        let mut deduction = Deduction::new(
            "cg_001",
            DeductionType::Garnishment,
            CalculationMethod::Fixed(Decimal::ZERO),
            TaxTreatment::PostTax,
        );
        deduction.garnishment = Some(GarnishmentOrder {
            order_number: "ORD-1".to_string(),
            garnishment_type,
            issuing_authority: "test".to_string(),
            priority: None,
            max_percentage: max_percentage.map(dec),
            fixed_amount: fixed_amount.map(dec),
            remaining_balance: remaining_balance.map(dec),
        });
        deduction
    }

    // ==========================================================================
    // Ceilings
    // ==========================================================================

    #[test]
    fn test_child_support_takes_half_of_disposable() {
        let deduction = garnishment(GarnishmentType::ChildSupport, None, None, None);
        assert_eq!(garnishment_amount(dec("800"), &deduction, &limits()), dec("400.00"));
    }

    #[test]
    fn test_student_loan_default_ceiling() {
        let deduction = garnishment(GarnishmentType::StudentLoan, None, None, None);
        assert_eq!(garnishment_amount(dec("1000"), &deduction, &limits()), dec("150.00"));
    }

    #[test]
    fn test_order_max_percentage_overrides_type_default() {
        let deduction = garnishment(GarnishmentType::ChildSupport, Some("0.40"), None, None);
        assert_eq!(garnishment_amount(dec("1000"), &deduction, &limits()), dec("400.00"));
    }

    #[test]
    fn test_tax_levy_can_take_everything() {
        let deduction = garnishment(GarnishmentType::TaxLevy, None, None, None);
        assert_eq!(garnishment_amount(dec("600"), &deduction, &limits()), dec("600.00"));
    }

    // ==========================================================================
    // Fixed amounts and balances
    // ==========================================================================

    #[test]
    fn test_fixed_amount_used_when_under_ceiling() {
        let deduction = garnishment(GarnishmentType::ChildSupport, None, Some("150"), None);
        assert_eq!(garnishment_amount(dec("1000"), &deduction, &limits()), dec("150.00"));
    }

    #[test]
    fn test_fixed_amount_capped_by_ceiling() {
        // Ceiling is 50% of 400 = 200; the ordered 300 cannot be taken.
        let deduction = garnishment(GarnishmentType::ChildSupport, None, Some("300"), None);
        assert_eq!(garnishment_amount(dec("400"), &deduction, &limits()), dec("200.00"));
    }

    #[test]
    fn test_remaining_balance_caps_withholding() {
        let deduction = garnishment(GarnishmentType::Creditor, None, None, Some("37.50"));
        assert_eq!(garnishment_amount(dec("1000"), &deduction, &limits()), dec("37.50"));
    }

    #[test]
    fn test_zero_disposable_income_withholds_nothing() {
        let deduction = garnishment(GarnishmentType::ChildSupport, None, None, None);
        assert_eq!(garnishment_amount(Decimal::ZERO, &deduction, &limits()), Decimal::ZERO);
    }

    #[test]
    fn test_missing_order_falls_back_to_default_limit() {
        let deduction = Deduction::new(
            "cg_001",
            DeductionType::Garnishment,
            CalculationMethod::Fixed(Decimal::ZERO),
            TaxTreatment::PostTax,
        );
        assert_eq!(garnishment_amount(dec("1000"), &deduction, &limits()), dec("250.00"));
    }

    // ==========================================================================
    // Priority ordering
    // ==========================================================================

    #[test]
    fn test_sort_by_type_rank() {
        let creditor = garnishment(GarnishmentType::Creditor, None, None, None);
        let child = garnishment(GarnishmentType::ChildSupport, None, None, None);
        let levy = garnishment(GarnishmentType::TaxLevy, None, None, None);
        let mut refs = [&creditor, &child, &levy];
        sort_garnishments_by_priority(&mut refs);
        let types: Vec<GarnishmentType> = refs
            .iter()
            .map(|d| d.garnishment.as_ref().unwrap().garnishment_type)
            .collect();
        assert_eq!(
            types,
            vec![
                GarnishmentType::ChildSupport,
                GarnishmentType::TaxLevy,
                GarnishmentType::Creditor
            ]
        );
    }

    #[test]
    fn test_order_priority_breaks_ties_within_type() {
        let mut first = garnishment(GarnishmentType::ChildSupport, None, None, None);
        first.garnishment.as_mut().unwrap().priority = Some(1);
        first.garnishment.as_mut().unwrap().order_number = "CS-A".to_string();
        let mut second = garnishment(GarnishmentType::ChildSupport, None, None, None);
        second.garnishment.as_mut().unwrap().priority = Some(2);
        second.garnishment.as_mut().unwrap().order_number = "CS-B".to_string();
        let unprioritized = garnishment(GarnishmentType::ChildSupport, None, None, None);

        let mut refs = [&unprioritized, &second, &first];
        sort_garnishments_by_priority(&mut refs);
        assert_eq!(refs[0].garnishment.as_ref().unwrap().order_number, "CS-A");
        assert_eq!(refs[1].garnishment.as_ref().unwrap().order_number, "CS-B");
        assert!(refs[2].garnishment.as_ref().unwrap().priority.is_none());
    }
}
