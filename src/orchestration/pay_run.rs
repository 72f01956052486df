//! The transactional pay run orchestrator.
//!
//! `create_pay_run` is the only place where calculation results become
//! persistent state, and it is all-or-nothing: every stub, sheet
//! transition, YTD update and the run itself commit together or not at
//! all.

use chrono::Datelike;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::TaxTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PayPeriodStatus, PayRun, PayRunStatus, TimeSheet, TimeSheetStatus};
use crate::paystub::calculate_pay_stub;

use super::repository::{PayrollRepository, TransactionScope};

/// Executes a pay run for a locked pay period.
///
/// Preconditions are checked before the transaction opens: the period
/// must be `Locked` or `Processing`, and at least one approved time
/// sheet must exist — a run with nothing to pay fails fast without
/// touching any state. Inside the transaction, each approved sheet is
/// calculated into a pay stub, the sheet moves to `Processing`, and
/// per-caregiver year-to-date totals advance. Any error rolls everything
/// back.
///
/// # Errors
///
/// `InvalidPayPeriodStatus`, `NoEligibleTimeSheets`, or anything the
/// calculation pipeline and repository can raise.
pub fn create_pay_run<R>(
    repo: &mut R,
    pay_period_id: Uuid,
    tables: &TaxTables,
    actor: &str,
) -> EngineResult<PayRun>
where
    R: PayrollRepository + TransactionScope,
{
    let period = repo.find_pay_period(pay_period_id)?;
    if !period.can_start_pay_run() {
        return Err(EngineError::InvalidPayPeriodStatus {
            pay_period_id,
            status: period.status.to_string(),
        });
    }
    let sheets = repo.approved_time_sheets(pay_period_id)?;
    if sheets.is_empty() {
        return Err(EngineError::NoEligibleTimeSheets { pay_period_id });
    }

    info!(
        %pay_period_id,
        sheet_count = sheets.len(),
        actor,
        "starting pay run"
    );
    repo.begin()?;
    match execute(repo, period, sheets, tables, actor) {
        Ok(run) => {
            repo.commit()?;
            info!(
                run_number = %run.run_number,
                total_pay_stubs = run.total_pay_stubs,
                total_gross = %run.total_gross,
                total_net = %run.total_net,
                "pay run committed"
            );
            Ok(run)
        }
        Err(e) => {
            error!(%pay_period_id, error = %e, "pay run failed, rolling back");
            repo.rollback()?;
            Err(e)
        }
    }
}

fn execute<R>(
    repo: &mut R,
    mut period: PayPeriod,
    sheets: Vec<TimeSheet>,
    tables: &TaxTables,
    actor: &str,
) -> EngineResult<PayRun>
where
    R: PayrollRepository,
{
    let mut run = PayRun::new(period.id, run_number(&period));
    run.transition(PayRunStatus::Calculating, actor, None)?;

    for mut sheet in sheets {
        let tax_config = repo.tax_configuration_for(&sheet.caregiver_id, period.pay_date)?;
        let deductions = repo.deductions_for(&sheet.caregiver_id)?;
        let prior_ytd = repo.year_to_date(&sheet.caregiver_id)?;
        let payment_method = repo.payment_method_for(&sheet.caregiver_id)?;

        let unresolved = sheet.discrepancies.iter().filter(|f| !f.resolved).count();
        if unresolved > 0 {
            run.warnings.push(format!(
                "time sheet {} for {} carries {} unresolved non-blocking flag(s)",
                sheet.id, sheet.caregiver_id, unresolved
            ));
            warn!(time_sheet_id = %sheet.id, unresolved, "paying sheet with open flags");
        }

        let mut stub = calculate_pay_stub(
            &sheet,
            period.period_type,
            &tax_config,
            &deductions,
            &prior_ytd,
            payment_method,
            tables,
        )?;
        stub.pay_run_id = Some(run.id);
        run.record_stub(&stub);
        repo.update_year_to_date(&sheet.caregiver_id, stub.ytd)?;
        repo.store_pay_stub(stub)?;

        sheet.transition(TimeSheetStatus::Processing, actor, None)?;
        repo.update_time_sheet(sheet)?;
    }

    run.transition(PayRunStatus::Calculated, actor, None)?;
    repo.store_pay_run(run.clone())?;

    period.pay_run_id = Some(run.id);
    if period.status == PayPeriodStatus::Locked {
        period.transition(PayPeriodStatus::Processing, actor, Some(&run.run_number))?;
    }
    repo.update_pay_period(period)?;
    Ok(run)
}

/// Builds a human-readable run number: `PR-<pay date>-<short uuid>`.
fn run_number(period: &PayPeriod) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "PR-{:04}{:02}{:02}-{}",
        period.pay_date.year(),
        period.pay_date.month(),
        period.pay_date.day(),
        &token[..8]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        FederalTaxTables, FicaConfig, FilingStatus, GarnishmentLimits, StateTaxTables,
        SupplementalRates, TaxBracket,
    };
    use crate::models::{CategoryTotal, PayPeriodType, TaxConfiguration};
    use crate::orchestration::InMemoryRepository;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tables() -> TaxTables {
        let mut brackets = HashMap::new();
        brackets.insert(
            FilingStatus::Single,
            vec![
                TaxBracket { up_to: Some(dec("11600")), rate: dec("0.10") },
                TaxBracket { up_to: Some(dec("47150")), rate: dec("0.12") },
                TaxBracket { up_to: None, rate: dec("0.22") },
            ],
        );
        let mut rates = HashMap::new();
        rates.insert("CA".to_string(), dec("0.0660"));
        TaxTables::new(
            FederalTaxTables {
                year: 2024,
                brackets,
                supplemental: SupplementalRates {
                    flat_rate: dec("0.22"),
                    high_earner_rate: dec("0.37"),
                    high_earner_threshold: dec("1000000"),
                },
            },
            FicaConfig {
                social_security_rate: dec("0.062"),
                social_security_wage_base: dec("168600"),
                medicare_rate: dec("0.0145"),
                additional_medicare_rate: dec("0.009"),
                additional_medicare_threshold: dec("200000"),
            },
            StateTaxTables { rates },
            GarnishmentLimits {
                child_support: dec("0.50"),
                spousal_support: dec("0.50"),
                tax_levy: dec("1.00"),
                student_loan: dec("0.15"),
                creditor: dec("0.25"),
                default_limit: dec("0.25"),
            },
        )
    }

    fn locked_period() -> PayPeriod {
        let mut period = PayPeriod::new(
            date(2024, 6, 3),
            date(2024, 6, 16),
            date(2024, 6, 21),
            date(2024, 6, 17),
            PayPeriodType::BiWeekly,
        );
        period.transition(PayPeriodStatus::Open, "admin", None).unwrap();
        period.transition(PayPeriodStatus::Locked, "admin", None).unwrap();
        period
    }

    fn approved_sheet(caregiver_id: &str, pay_period_id: Uuid, gross: &str) -> TimeSheet {
        let mut sheet = TimeSheet::new(caregiver_id, pay_period_id);
        sheet.summary.regular = CategoryTotal {
            hours: dec("40"),
            earnings: dec(gross),
        };
        sheet.transition(TimeSheetStatus::Submitted, caregiver_id, None).unwrap();
        sheet.transition(TimeSheetStatus::Approved, "supervisor_01", None).unwrap();
        sheet
    }

    fn seeded_repo(period: &PayPeriod, caregivers: &[(&str, &str)]) -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.insert_pay_period(period.clone());
        for (caregiver_id, gross) in caregivers {
            repo.insert_time_sheet(approved_sheet(caregiver_id, period.id, gross));
            repo.insert_tax_configuration(TaxConfiguration::new(
                caregiver_id,
                FilingStatus::Single,
                "CA",
                date(2024, 1, 1),
            ));
        }
        repo
    }

    #[test]
    fn test_successful_run_commits_everything() {
        let period = locked_period();
        let mut repo = seeded_repo(&period, &[("cg_001", "1000"), ("cg_002", "800")]);

        let run = create_pay_run(&mut repo, period.id, &tables(), "admin").unwrap();

        assert_eq!(run.total_pay_stubs, 2);
        assert_eq!(run.total_gross, dec("1800"));
        assert_eq!(run.status, PayRunStatus::Calculated);
        assert!(run.run_number.starts_with("PR-20240621-"));

        // Period references the run and moved to Processing.
        let stored = repo.find_pay_period(period.id).unwrap();
        assert_eq!(stored.status, PayPeriodStatus::Processing);
        assert_eq!(stored.pay_run_id, Some(run.id));

        // Stubs stored and sheets advanced.
        assert_eq!(repo.pay_stub_count(), 2);
        for stub_id in &run.pay_stub_ids {
            let stub = repo.find_pay_stub(*stub_id).unwrap();
            assert_eq!(stub.pay_run_id, Some(run.id));
        }
        assert!(repo.approved_time_sheets(period.id).unwrap().is_empty());

        // YTD advanced to include the period.
        assert_eq!(repo.year_to_date("cg_001").unwrap().gross_pay, dec("1000"));
    }

    #[test]
    fn test_unlocked_period_rejected_before_transaction() {
        let mut period = PayPeriod::new(
            date(2024, 6, 3),
            date(2024, 6, 16),
            date(2024, 6, 21),
            date(2024, 6, 17),
            PayPeriodType::BiWeekly,
        );
        period.transition(PayPeriodStatus::Open, "admin", None).unwrap();
        let mut repo = seeded_repo(&period, &[("cg_001", "1000")]);

        let err = create_pay_run(&mut repo, period.id, &tables(), "admin").unwrap_err();
        assert!(matches!(err, EngineError::InvalidPayPeriodStatus { .. }));
        assert_eq!(repo.pay_run_count(), 0);
    }

    #[test]
    fn test_no_eligible_sheets_mutates_nothing() {
        let period = locked_period();
        let mut repo = InMemoryRepository::new();
        repo.insert_pay_period(period.clone());

        let err = create_pay_run(&mut repo, period.id, &tables(), "admin").unwrap_err();
        assert!(matches!(err, EngineError::NoEligibleTimeSheets { .. }));
        assert_eq!(repo.pay_run_count(), 0);
        assert_eq!(repo.pay_stub_count(), 0);
        let stored = repo.find_pay_period(period.id).unwrap();
        assert_eq!(stored.status, PayPeriodStatus::Locked);
        assert!(stored.pay_run_id.is_none());
    }

    #[test]
    fn test_missing_tax_configuration_rolls_back_whole_run() {
        let period = locked_period();
        let mut repo = seeded_repo(&period, &[("cg_001", "1000")]);
        // Second sheet whose caregiver has no tax configuration.
        repo.insert_time_sheet(approved_sheet("cg_999", period.id, "700"));

        let err = create_pay_run(&mut repo, period.id, &tables(), "admin").unwrap_err();
        assert!(matches!(err, EngineError::TaxConfigurationNotFound { .. }));

        // Nothing persisted, including the stub that calculated cleanly.
        assert_eq!(repo.pay_run_count(), 0);
        assert_eq!(repo.pay_stub_count(), 0);
        assert_eq!(repo.year_to_date("cg_001").unwrap().gross_pay, Decimal::ZERO);
        assert_eq!(repo.approved_time_sheets(period.id).unwrap().len(), 2);
        let stored = repo.find_pay_period(period.id).unwrap();
        assert_eq!(stored.status, PayPeriodStatus::Locked);
        assert!(stored.pay_run_id.is_none());
    }

    #[test]
    fn test_unknown_period_is_entity_not_found() {
        let mut repo = InMemoryRepository::new();
        let err = create_pay_run(&mut repo, Uuid::new_v4(), &tables(), "admin").unwrap_err();
        assert!(matches!(err, EngineError::EntityNotFound { .. }));
    }

    #[test]
    fn test_warning_recorded_for_sheet_with_open_non_blocking_flag() {
        use crate::models::{DiscrepancyFlag, DiscrepancyKind, DiscrepancySeverity};
        let period = locked_period();
        let mut repo = InMemoryRepository::new();
        repo.insert_pay_period(period.clone());
        let mut sheet = approved_sheet("cg_001", period.id, "1000");
        sheet.discrepancies.push(DiscrepancyFlag::new(
            DiscrepancyKind::ShortDuration,
            DiscrepancySeverity::Medium,
            "entry e3 is only 0.2 hours",
            vec!["e3".to_string()],
            false,
        ));
        repo.insert_time_sheet(sheet);
        repo.insert_tax_configuration(TaxConfiguration::new(
            "cg_001",
            FilingStatus::Single,
            "CA",
            date(2024, 1, 1),
        ));

        let run = create_pay_run(&mut repo, period.id, &tables(), "admin").unwrap();
        assert_eq!(run.warnings.len(), 1);
        assert!(run.warnings[0].contains("cg_001"));
        assert!(run.errors.is_empty());
    }

    #[test]
    fn test_payment_method_counts_accumulate() {
        let period = locked_period();
        let mut repo = seeded_repo(&period, &[("cg_001", "1000"), ("cg_002", "800")]);
        repo.insert_payment_method("cg_002", crate::models::PaymentMethod::Check);

        let run = create_pay_run(&mut repo, period.id, &tables(), "admin").unwrap();
        assert_eq!(run.direct_deposit_count, 1);
        assert_eq!(run.check_count, 1);
        assert_eq!(run.cash_count, 0);
        assert_eq!(run.direct_deposit_amount + run.check_amount, run.total_net);
    }
}
