//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation and
//! pay-run orchestration.
//!
//! Data anomalies in time records (negative hours, overlapping shifts,
//! missing punches) are deliberately *not* errors; they become discrepancy
//! flags on the time sheet so that payroll stays auditable with imperfect
//! source data. Only the approval gate turns unresolved flags into an error.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/federal.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/federal.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No withholding rate is configured for the given state code.
    ///
    /// States with no income tax must still appear in the table with a rate
    /// of zero, so a missing entry means the table is incomplete.
    #[error("No state withholding rate configured for state '{state}'")]
    StateRateNotFound {
        /// The two-letter state code that was not found.
        state: String,
    },

    /// No federal bracket table is configured for the given filing status.
    #[error("No federal bracket table configured for filing status '{filing_status}'")]
    BracketTableNotFound {
        /// The filing status that was not found.
        filing_status: String,
    },

    /// Aggregate supplemental withholding was requested without the regular
    /// pay parameters it needs.
    ///
    /// This is a caller contract violation, not a runtime data error, and
    /// should never be retried.
    #[error("Aggregate supplemental withholding requires regular-pay parameters")]
    MissingAggregateParams,

    /// A lifecycle state machine rejected a transition.
    #[error("Invalid {entity} status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The entity whose state machine rejected the transition.
        entity: &'static str,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A time sheet cannot be approved while required discrepancy flags
    /// remain unresolved.
    #[error("Time sheet {time_sheet_id} has {blocking} unresolved discrepancy flag(s) requiring resolution")]
    UnresolvedDiscrepancies {
        /// The time sheet that failed approval.
        time_sheet_id: Uuid,
        /// The number of unresolved flags that require resolution.
        blocking: usize,
    },

    /// A pay run was requested against a pay period that is not locked for
    /// processing.
    #[error("Pay period {pay_period_id} is {status}; a pay run requires a locked or processing period")]
    InvalidPayPeriodStatus {
        /// The pay period in question.
        pay_period_id: Uuid,
        /// Its current status.
        status: String,
    },

    /// A pay run was requested for a period with no approved time sheets.
    ///
    /// Detected before any transaction is opened, so no state is touched.
    #[error("Pay period {pay_period_id} has no approved time sheets")]
    NoEligibleTimeSheets {
        /// The pay period in question.
        pay_period_id: Uuid,
    },

    /// No tax configuration is effective for a caregiver on the given date.
    #[error("No tax configuration effective for caregiver '{caregiver_id}' on {date}")]
    TaxConfigurationNotFound {
        /// The caregiver whose configuration was missing.
        caregiver_id: String,
        /// The date for which a configuration was requested.
        date: NaiveDate,
    },

    /// A persisted entity could not be found by its identifier.
    #[error("{entity} not found: {id}")]
    EntityNotFound {
        /// The entity type that was looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: Uuid,
    },

    /// The persistence collaborator reported a failure.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
