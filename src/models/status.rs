//! Status history log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in an entity's append-only status history.
///
/// Every lifecycle transition records who made it, when, and why. History
/// entries are never edited or removed once appended.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{StatusChange, TimeSheetStatus};
///
/// let change = StatusChange::new(
///     TimeSheetStatus::Draft,
///     TimeSheetStatus::Submitted,
///     "cg_001",
///     Some("submitted for review"),
/// );
/// assert_eq!(change.from, TimeSheetStatus::Draft);
/// assert_eq!(change.to, TimeSheetStatus::Submitted);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange<S> {
    /// The status before the transition.
    pub from: S,
    /// The status after the transition.
    pub to: S,
    /// When the transition was recorded.
    pub timestamp: DateTime<Utc>,
    /// Who performed the transition.
    pub actor: String,
    /// Optional free-text reason for the transition.
    pub reason: Option<String>,
}

impl<S> StatusChange<S> {
    /// Creates a new history entry timestamped now.
    pub fn new(from: S, to: S, actor: &str, reason: Option<&str>) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
            actor: actor.to_string(),
            reason: reason.map(str::to_string),
        }
    }
}
