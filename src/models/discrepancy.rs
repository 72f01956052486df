//! Discrepancy flags raised against time sheet entries.
//!
//! Anomalies in time data are recorded as flags rather than rejected, so
//! payroll remains auditable even when source data is imperfect. Only the
//! approval gate enforces that flags requiring resolution are resolved
//! before money moves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a detected discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancySeverity {
    /// Likely data-entry noise; informational.
    Medium,
    /// Suspicious data that should be reviewed.
    High,
    /// Data that cannot be correct as recorded.
    Critical,
}

/// The kind of anomaly a discrepancy flag describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Total hours across the pay period exceed the period ceiling.
    ExcessivePeriodHours,
    /// A single day's summed hours exceed the daily ceiling.
    ExcessiveDailyHours,
    /// Two entries overlap in time.
    OverlappingEntries,
    /// An entry spans more than 24 hours; likely a missing clock-out.
    PossibleMissingClockOut,
    /// An entry shorter than 15 minutes; likely data-entry noise.
    ShortDuration,
    /// An entry with negative hours.
    NegativeHours,
    /// An entry whose clock-out precedes its clock-in.
    ClockOutBeforeClockIn,
    /// Entries pre-flagged for review by upstream compliance checks.
    RequiresReview,
}

/// A severity-tagged flag raised by the discrepancy detector.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{DiscrepancyFlag, DiscrepancyKind, DiscrepancySeverity};
///
/// let mut flag = DiscrepancyFlag::new(
///     DiscrepancyKind::ExcessivePeriodHours,
///     DiscrepancySeverity::High,
///     "82.5 hours worked in period exceeds 80 hour ceiling",
///     vec![],
///     true,
/// );
/// assert!(flag.is_blocking());
/// flag.resolve("supervisor_01");
/// assert!(!flag.is_blocking());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscrepancyFlag {
    /// What kind of anomaly this is.
    pub kind: DiscrepancyKind,
    /// How severe the anomaly is.
    pub severity: DiscrepancySeverity,
    /// Human-readable description of the anomaly.
    pub message: String,
    /// The entry ids involved in the anomaly.
    pub entry_ids: Vec<String>,
    /// Whether the flag must be resolved before the sheet can be approved.
    pub requires_resolution: bool,
    /// Whether the flag has been resolved.
    pub resolved: bool,
    /// Who resolved the flag, if resolved.
    pub resolved_by: Option<String>,
    /// When the flag was resolved, if resolved.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl DiscrepancyFlag {
    /// Creates a new, unresolved flag.
    pub fn new(
        kind: DiscrepancyKind,
        severity: DiscrepancySeverity,
        message: impl Into<String>,
        entry_ids: Vec<String>,
        requires_resolution: bool,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            entry_ids,
            requires_resolution,
            resolved: false,
            resolved_by: None,
            resolved_at: None,
        }
    }

    /// Marks the flag as resolved by the given actor.
    pub fn resolve(&mut self, actor: &str) {
        self.resolved = true;
        self.resolved_by = Some(actor.to_string());
        self.resolved_at = Some(Utc::now());
    }

    /// Returns true if this flag blocks time sheet approval.
    pub fn is_blocking(&self) -> bool {
        self.requires_resolution && !self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flag_is_unresolved() {
        let flag = DiscrepancyFlag::new(
            DiscrepancyKind::NegativeHours,
            DiscrepancySeverity::Critical,
            "entry has -2 hours",
            vec!["entry_001".to_string()],
            true,
        );
        assert!(!flag.resolved);
        assert!(flag.resolved_by.is_none());
        assert!(flag.is_blocking());
    }

    #[test]
    fn test_resolve_records_actor_and_time() {
        let mut flag = DiscrepancyFlag::new(
            DiscrepancyKind::OverlappingEntries,
            DiscrepancySeverity::Critical,
            "entries overlap",
            vec!["entry_001".to_string(), "entry_002".to_string()],
            true,
        );
        flag.resolve("supervisor_01");
        assert!(flag.resolved);
        assert_eq!(flag.resolved_by.as_deref(), Some("supervisor_01"));
        assert!(flag.resolved_at.is_some());
        assert!(!flag.is_blocking());
    }

    #[test]
    fn test_non_required_flag_never_blocks() {
        let flag = DiscrepancyFlag::new(
            DiscrepancyKind::ShortDuration,
            DiscrepancySeverity::Medium,
            "entry is 0.1 hours",
            vec!["entry_003".to_string()],
            false,
        );
        assert!(!flag.is_blocking());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(DiscrepancySeverity::Medium < DiscrepancySeverity::High);
        assert!(DiscrepancySeverity::High < DiscrepancySeverity::Critical);
    }

    #[test]
    fn test_serialization_round_trip() {
        let flag = DiscrepancyFlag::new(
            DiscrepancyKind::PossibleMissingClockOut,
            DiscrepancySeverity::High,
            "entry spans 30 hours",
            vec!["entry_004".to_string()],
            true,
        );
        let json = serde_json::to_string(&flag).unwrap();
        assert!(json.contains("\"possible_missing_clock_out\""));
        assert!(json.contains("\"high\""));
        let deserialized: DiscrepancyFlag = serde_json::from_str(&json).unwrap();
        assert_eq!(flag, deserialized);
    }
}
