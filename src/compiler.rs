//! Timesheet compiler: turns verified time records into a priced,
//! categorized, discrepancy-annotated time sheet.
//!
//! The compiler is where raw punches meet overtime law. It splits worked
//! hours under the configured overtime variant, detects seventh
//! consecutive worked days and gives them premium treatment, prices each
//! entry with its rate multipliers, and aggregates the category summary
//! so the sheet's invariants hold by construction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::calculation::{
    DEFAULT_DOUBLE_TIME_MULTIPLIER, DEFAULT_OVERTIME_MULTIPLIER, HoursSplit, RateMultiplier,
    apply_rate_multipliers, clamp_non_negative, detect_discrepancies, pay_for_hours, split_hours,
    split_seventh_day_hours,
};
use crate::error::EngineResult;
use crate::models::{AppliedRateMultiplier, PayPeriod, TimeSheet, TimeSheetEntry};

/// A verified raw time record from the time-source collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRecord {
    /// Source identifier; carried onto the compiled entry.
    pub id: String,
    /// The caregiver the record belongs to.
    pub caregiver_id: String,
    /// The date the work is attributed to.
    pub work_date: NaiveDate,
    /// Clock-in time.
    pub clock_in: chrono::NaiveDateTime,
    /// Clock-out time.
    pub clock_out: chrono::NaiveDateTime,
    /// Unpaid break hours within the interval.
    pub break_hours: Decimal,
    /// Rate premiums applying to this record.
    pub multipliers: Vec<RateMultiplier>,
    /// Pre-flagged for review by upstream compliance checks.
    pub requires_review: bool,
    /// Optional service/visit code.
    pub service_code: Option<String>,
}

impl TimeRecord {
    /// Paid hours for the record: punch span less breaks, floored at zero.
    pub fn worked_hours(&self) -> Decimal {
        let minutes = (self.clock_out - self.clock_in).num_minutes();
        clamp_non_negative(Decimal::from(minutes) / Decimal::from(60) - self.break_hours)
    }
}

/// Provider of verified time records for a caregiver and period.
pub trait TimeRecordSource {
    /// Returns every verified record for the caregiver within the period.
    fn records_for(&self, caregiver_id: &str, period: &PayPeriod)
    -> EngineResult<Vec<TimeRecord>>;
}

/// Which overtime law applies when splitting hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvertimeRules {
    /// Weekly threshold; hours beyond it are overtime.
    Weekly {
        /// Weekly regular-hours threshold (typically 40).
        threshold: Decimal,
    },
    /// Daily thresholds; overtime past the first, double time past the
    /// second, reset each day.
    Daily {
        /// Daily overtime threshold (typically 8).
        overtime: Decimal,
        /// Daily double-time threshold (typically 12).
        double_time: Decimal,
    },
    /// Live-in caregiver weekly threshold (typically 44), no double time.
    LiveIn {
        /// Weekly regular-hours threshold.
        threshold: Decimal,
    },
}

/// Compiles a caregiver's records for a pay period into a `Draft`
/// [`TimeSheet`].
///
/// Records dated outside the period are skipped with a warning. A
/// seventh consecutive worked day is detected across the whole period
/// and receives premium treatment regardless of the overtime variant:
/// zero regular hours, overtime up to eight hours, double time beyond.
pub fn compile_time_sheet(
    caregiver_id: &str,
    pay_period: &PayPeriod,
    records: &[TimeRecord],
    base_rate: Decimal,
    rules: &OvertimeRules,
) -> TimeSheet {
    info!(
        caregiver_id,
        pay_period_id = %pay_period.id,
        record_count = records.len(),
        "compiling time sheet"
    );

    let mut records: Vec<&TimeRecord> = records
        .iter()
        .filter(|r| {
            let in_period = pay_period.contains_date(r.work_date);
            if !in_period {
                warn!(record_id = %r.id, work_date = %r.work_date, "record outside pay period, skipped");
            }
            in_period
        })
        .collect();
    records.sort_by_key(|r| r.clock_in);

    let mut day_hours: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in &records {
        *day_hours.entry(record.work_date).or_default() += record.worked_hours();
    }
    let seventh_days = seventh_consecutive_days(&day_hours);

    // Split each worked day under the applicable rule, then allocate the
    // day's buckets across that day's records in punch order.
    let mut day_splits: BTreeMap<NaiveDate, HoursSplit> = BTreeMap::new();
    let mut weekly_room = match rules {
        OvertimeRules::Weekly { threshold } | OvertimeRules::LiveIn { threshold } => *threshold,
        OvertimeRules::Daily { .. } => Decimal::ZERO,
    };
    for (&date, &hours) in &day_hours {
        let split = if seventh_days.contains(&date) {
            debug!(%date, %hours, "seventh consecutive worked day");
            split_seventh_day_hours(hours)
        } else {
            match rules {
                OvertimeRules::Daily { overtime, double_time } => {
                    split_hours(hours, *overtime, Some(*double_time))
                }
                OvertimeRules::Weekly { .. } | OvertimeRules::LiveIn { .. } => {
                    let regular = hours.min(weekly_room);
                    weekly_room -= regular;
                    HoursSplit {
                        regular,
                        overtime: hours - regular,
                        double_time: Decimal::ZERO,
                    }
                }
            }
        };
        day_splits.insert(date, split);
    }

    let mut sheet = TimeSheet::new(caregiver_id, pay_period.id);
    for record in &records {
        let remaining = day_splits
            .get(&record.work_date)
            .copied()
            .unwrap_or_default();
        let mut split = HoursSplit::default();
        let mut hours = record.worked_hours();
        split.regular = hours.min(remaining.regular);
        hours -= split.regular;
        split.overtime = hours.min(remaining.overtime);
        hours -= split.overtime;
        split.double_time = hours.min(remaining.double_time);
        if let Some(day) = day_splits.get_mut(&record.work_date) {
            day.regular -= split.regular;
            day.overtime -= split.overtime;
            day.double_time -= split.double_time;
        }

        let effective_rate = apply_rate_multipliers(base_rate, &record.multipliers);
        let pay = pay_for_hours(
            &split,
            effective_rate,
            DEFAULT_OVERTIME_MULTIPLIER,
            DEFAULT_DOUBLE_TIME_MULTIPLIER,
        );
        let entry = TimeSheetEntry {
            id: record.id.clone(),
            work_date: record.work_date,
            clock_in: record.clock_in,
            clock_out: record.clock_out,
            regular_hours: split.regular,
            overtime_hours: split.overtime,
            double_time_hours: split.double_time,
            break_hours: record.break_hours,
            base_rate: effective_rate,
            multipliers: record
                .multipliers
                .iter()
                .map(|m| AppliedRateMultiplier {
                    multiplier_type: m.multiplier_type,
                    factor: m.multiplier,
                    base_rate,
                    amount_delta: crate::calculation::round_to_cents(
                        base_rate * (m.multiplier - Decimal::ONE),
                    ),
                })
                .collect(),
            earnings: pay.total_pay,
            requires_review: record.requires_review,
            service_code: record.service_code.clone(),
        };

        sheet.summary.regular.hours += split.regular;
        sheet.summary.regular.earnings += pay.regular_pay;
        sheet.summary.overtime.hours += split.overtime;
        sheet.summary.overtime.earnings += pay.overtime_pay;
        sheet.summary.double_time.hours += split.double_time;
        sheet.summary.double_time.earnings += pay.double_time_pay;
        sheet.entries.push(entry);
    }

    sheet.discrepancies = detect_discrepancies(&sheet.entries);
    if !sheet.discrepancies.is_empty() {
        warn!(
            time_sheet_id = %sheet.id,
            flag_count = sheet.discrepancies.len(),
            "discrepancies detected during compilation"
        );
    }
    info!(
        time_sheet_id = %sheet.id,
        total_hours = %sheet.total_hours(),
        gross_earnings = %sheet.gross_earnings(),
        "time sheet compiled"
    );
    sheet
}

/// Marks every date that is the seventh or later day of a consecutive
/// worked-day run.
fn seventh_consecutive_days(day_hours: &BTreeMap<NaiveDate, Decimal>) -> BTreeSet<NaiveDate> {
    let mut marked = BTreeSet::new();
    let mut streak = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for (&date, &hours) in day_hours {
        if hours <= Decimal::ZERO {
            continue;
        }
        streak = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => streak + 1,
            _ => 1,
        };
        if streak >= 7 {
            marked.insert(date);
        }
        previous = Some(date);
    }
    marked
}
