//! Persistence seams for the orchestrator.
//!
//! `PayrollRepository` is the storage abstraction the orchestrator works
//! against; `TransactionScope` is its all-or-nothing boundary. The
//! in-memory implementation backs the integration tests with
//! snapshot-on-begin, restore-on-rollback semantics.

use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Deduction, PayPeriod, PayRun, PayStub, PaymentMethod, TaxConfiguration, TimeSheet,
    TimeSheetStatus, YearToDate,
};

/// Storage operations the pay run orchestrator needs.
pub trait PayrollRepository {
    /// Fetches a pay period by id.
    fn find_pay_period(&self, id: Uuid) -> EngineResult<PayPeriod>;
    /// Persists an updated pay period.
    fn update_pay_period(&mut self, period: PayPeriod) -> EngineResult<()>;
    /// Returns every approved time sheet for a pay period.
    fn approved_time_sheets(&self, pay_period_id: Uuid) -> EngineResult<Vec<TimeSheet>>;
    /// Persists an updated time sheet.
    fn update_time_sheet(&mut self, sheet: TimeSheet) -> EngineResult<()>;
    /// Persists a new pay run.
    fn store_pay_run(&mut self, run: PayRun) -> EngineResult<()>;
    /// Fetches a pay run by id.
    fn find_pay_run(&self, id: Uuid) -> EngineResult<PayRun>;
    /// Persists a new pay stub.
    fn store_pay_stub(&mut self, stub: PayStub) -> EngineResult<()>;
    /// Fetches a pay stub by id.
    fn find_pay_stub(&self, id: Uuid) -> EngineResult<PayStub>;
    /// Returns the tax configuration effective for a caregiver on a date.
    fn tax_configuration_for(
        &self,
        caregiver_id: &str,
        date: NaiveDate,
    ) -> EngineResult<TaxConfiguration>;
    /// Returns a caregiver's active deductions.
    fn deductions_for(&self, caregiver_id: &str) -> EngineResult<Vec<Deduction>>;
    /// Returns a caregiver's year-to-date totals.
    fn year_to_date(&self, caregiver_id: &str) -> EngineResult<YearToDate>;
    /// Persists a caregiver's updated year-to-date totals.
    fn update_year_to_date(&mut self, caregiver_id: &str, ytd: YearToDate) -> EngineResult<()>;
    /// Returns how a caregiver is paid.
    fn payment_method_for(&self, caregiver_id: &str) -> EngineResult<PaymentMethod>;
}

/// All-or-nothing boundary around a batch of repository writes.
pub trait TransactionScope {
    /// Opens a transaction.
    fn begin(&mut self) -> EngineResult<()>;
    /// Makes every write since `begin` permanent.
    fn commit(&mut self) -> EngineResult<()>;
    /// Discards every write since `begin`.
    fn rollback(&mut self) -> EngineResult<()>;
}

#[derive(Debug, Clone, Default)]
struct State {
    pay_periods: HashMap<Uuid, PayPeriod>,
    time_sheets: HashMap<Uuid, TimeSheet>,
    pay_runs: HashMap<Uuid, PayRun>,
    pay_stubs: HashMap<Uuid, PayStub>,
    tax_configurations: HashMap<String, Vec<TaxConfiguration>>,
    deductions: HashMap<String, Vec<Deduction>>,
    year_to_date: HashMap<String, YearToDate>,
    payment_methods: HashMap<String, PaymentMethod>,
}

/// In-memory repository with snapshot-based transactions.
///
/// `begin` clones the entire state; `rollback` restores the clone;
/// `commit` discards it. Good enough for tests, where state is small.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: State,
    snapshot: Option<State>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a pay period.
    pub fn insert_pay_period(&mut self, period: PayPeriod) {
        self.state.pay_periods.insert(period.id, period);
    }

    /// Seeds a time sheet.
    pub fn insert_time_sheet(&mut self, sheet: TimeSheet) {
        self.state.time_sheets.insert(sheet.id, sheet);
    }

    /// Seeds a caregiver's tax configuration.
    pub fn insert_tax_configuration(&mut self, config: TaxConfiguration) {
        self.state
            .tax_configurations
            .entry(config.caregiver_id.clone())
            .or_default()
            .push(config);
    }

    /// Seeds a deduction for its caregiver.
    pub fn insert_deduction(&mut self, deduction: Deduction) {
        self.state
            .deductions
            .entry(deduction.caregiver_id.clone())
            .or_default()
            .push(deduction);
    }

    /// Seeds a caregiver's year-to-date totals.
    pub fn insert_year_to_date(&mut self, caregiver_id: &str, ytd: YearToDate) {
        self.state.year_to_date.insert(caregiver_id.to_string(), ytd);
    }

    /// Seeds a caregiver's payment method.
    pub fn insert_payment_method(&mut self, caregiver_id: &str, method: PaymentMethod) {
        self.state
            .payment_methods
            .insert(caregiver_id.to_string(), method);
    }

    /// Number of stored pay stubs.
    pub fn pay_stub_count(&self) -> usize {
        self.state.pay_stubs.len()
    }

    /// Number of stored pay runs.
    pub fn pay_run_count(&self) -> usize {
        self.state.pay_runs.len()
    }

    /// Fetches a time sheet by id.
    pub fn find_time_sheet(&self, id: Uuid) -> EngineResult<TimeSheet> {
        self.state
            .time_sheets
            .get(&id)
            .cloned()
            .ok_or(EngineError::EntityNotFound {
                entity: "TimeSheet",
                id,
            })
    }
}

impl PayrollRepository for InMemoryRepository {
    fn find_pay_period(&self, id: Uuid) -> EngineResult<PayPeriod> {
        self.state
            .pay_periods
            .get(&id)
            .cloned()
            .ok_or(EngineError::EntityNotFound {
                entity: "PayPeriod",
                id,
            })
    }

    fn update_pay_period(&mut self, period: PayPeriod) -> EngineResult<()> {
        self.state.pay_periods.insert(period.id, period);
        Ok(())
    }

    fn approved_time_sheets(&self, pay_period_id: Uuid) -> EngineResult<Vec<TimeSheet>> {
        let mut sheets: Vec<TimeSheet> = self
            .state
            .time_sheets
            .values()
            .filter(|s| s.pay_period_id == pay_period_id && s.status == TimeSheetStatus::Approved)
            .cloned()
            .collect();
        sheets.sort_by(|a, b| a.caregiver_id.cmp(&b.caregiver_id));
        Ok(sheets)
    }

    fn update_time_sheet(&mut self, sheet: TimeSheet) -> EngineResult<()> {
        self.state.time_sheets.insert(sheet.id, sheet);
        Ok(())
    }

    fn store_pay_run(&mut self, run: PayRun) -> EngineResult<()> {
        self.state.pay_runs.insert(run.id, run);
        Ok(())
    }

    fn find_pay_run(&self, id: Uuid) -> EngineResult<PayRun> {
        self.state
            .pay_runs
            .get(&id)
            .cloned()
            .ok_or(EngineError::EntityNotFound {
                entity: "PayRun",
                id,
            })
    }

    fn store_pay_stub(&mut self, stub: PayStub) -> EngineResult<()> {
        self.state.pay_stubs.insert(stub.id, stub);
        Ok(())
    }

    fn find_pay_stub(&self, id: Uuid) -> EngineResult<PayStub> {
        self.state
            .pay_stubs
            .get(&id)
            .cloned()
            .ok_or(EngineError::EntityNotFound {
                entity: "PayStub",
                id,
            })
    }

    fn tax_configuration_for(
        &self,
        caregiver_id: &str,
        date: NaiveDate,
    ) -> EngineResult<TaxConfiguration> {
        self.state
            .tax_configurations
            .get(caregiver_id)
            .and_then(|configs| TaxConfiguration::effective_on(configs, date))
            .cloned()
            .ok_or_else(|| EngineError::TaxConfigurationNotFound {
                caregiver_id: caregiver_id.to_string(),
                date,
            })
    }

    fn deductions_for(&self, caregiver_id: &str) -> EngineResult<Vec<Deduction>> {
        Ok(self
            .state
            .deductions
            .get(caregiver_id)
            .cloned()
            .unwrap_or_default())
    }

    fn year_to_date(&self, caregiver_id: &str) -> EngineResult<YearToDate> {
        Ok(self
            .state
            .year_to_date
            .get(caregiver_id)
            .copied()
            .unwrap_or_default())
    }

    fn update_year_to_date(&mut self, caregiver_id: &str, ytd: YearToDate) -> EngineResult<()> {
        self.state.year_to_date.insert(caregiver_id.to_string(), ytd);
        Ok(())
    }

    fn payment_method_for(&self, caregiver_id: &str) -> EngineResult<PaymentMethod> {
        Ok(self
            .state
            .payment_methods
            .get(caregiver_id)
            .copied()
            .unwrap_or(PaymentMethod::DirectDeposit))
    }
}

impl TransactionScope for InMemoryRepository {
    fn begin(&mut self) -> EngineResult<()> {
        if self.snapshot.is_some() {
            return Err(EngineError::Storage {
                message: "transaction already in progress".to_string(),
            });
        }
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> EngineResult<()> {
        match self.snapshot.take() {
            Some(_) => Ok(()),
            None => Err(EngineError::Storage {
                message: "commit without an open transaction".to_string(),
            }),
        }
    }

    fn rollback(&mut self) -> EngineResult<()> {
        match self.snapshot.take() {
            Some(snapshot) => {
                self.state = snapshot;
                Ok(())
            }
            None => Err(EngineError::Storage {
                message: "rollback without an open transaction".to_string(),
            }),
        }
    }
}
