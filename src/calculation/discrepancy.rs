//! Discrepancy detection over time sheet entries.
//!
//! The detector flags anomalies instead of rejecting them; bad data is
//! surfaced to a reviewer, not silently dropped. Flags that require
//! resolution gate time sheet approval downstream.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{DiscrepancyFlag, DiscrepancyKind, DiscrepancySeverity, TimeSheetEntry};

/// Period-total hours above which a sheet is flagged.
pub const MAX_PERIOD_HOURS: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Single-day hours above which a day is flagged.
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(16, 0, 0, false, 0);

/// Punch span in hours beyond which a missing clock-out is suspected.
pub const MAX_ENTRY_SPAN_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Entries shorter than this (15 minutes) are flagged as likely noise.
pub const MIN_ENTRY_HOURS: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Scans a period's entries and returns every detected discrepancy.
///
/// Checks: period hours ceiling, daily hours ceiling, overlapping punch
/// pairs, punch spans suggesting a missing clock-out, sub-15-minute
/// entries, negative hours, inverted punches, and entries pre-flagged for
/// review upstream. Severity decides nothing by itself; each flag carries
/// its own `requires_resolution`.
pub fn detect_discrepancies(entries: &[TimeSheetEntry]) -> Vec<DiscrepancyFlag> {
    let mut flags = Vec::new();

    let period_hours: Decimal = entries.iter().map(|e| e.total_hours()).sum();
    if period_hours > MAX_PERIOD_HOURS {
        flags.push(DiscrepancyFlag::new(
            DiscrepancyKind::ExcessivePeriodHours,
            DiscrepancySeverity::High,
            format!(
                "{period_hours} hours worked in period exceeds the {MAX_PERIOD_HOURS} hour ceiling"
            ),
            entries.iter().map(|e| e.id.clone()).collect(),
            true,
        ));
    }

    let mut by_day: BTreeMap<_, (Decimal, Vec<String>)> = BTreeMap::new();
    for entry in entries {
        let day = by_day.entry(entry.work_date).or_default();
        day.0 += entry.total_hours();
        day.1.push(entry.id.clone());
    }
    for (work_date, (hours, entry_ids)) in by_day {
        if hours > MAX_DAILY_HOURS {
            flags.push(DiscrepancyFlag::new(
                DiscrepancyKind::ExcessiveDailyHours,
                DiscrepancySeverity::High,
                format!("{hours} hours on {work_date} exceeds the {MAX_DAILY_HOURS} hour ceiling"),
                entry_ids,
                true,
            ));
        }
    }

    let mut by_clock_in: Vec<&TimeSheetEntry> = entries.iter().collect();
    by_clock_in.sort_by_key(|e| e.clock_in);
    for pair in by_clock_in.windows(2) {
        if pair[0].clock_out > pair[1].clock_in {
            flags.push(DiscrepancyFlag::new(
                DiscrepancyKind::OverlappingEntries,
                DiscrepancySeverity::Critical,
                format!("entries {} and {} overlap in time", pair[0].id, pair[1].id),
                vec![pair[0].id.clone(), pair[1].id.clone()],
                true,
            ));
        }
    }

    for entry in entries {
        let span = entry.punch_duration_hours();
        let hours = entry.total_hours();
        if span > MAX_ENTRY_SPAN_HOURS {
            flags.push(DiscrepancyFlag::new(
                DiscrepancyKind::PossibleMissingClockOut,
                DiscrepancySeverity::High,
                format!("entry {} spans {span} hours; possible missing clock-out", entry.id),
                vec![entry.id.clone()],
                true,
            ));
        }
        if hours > Decimal::ZERO && hours < MIN_ENTRY_HOURS {
            flags.push(DiscrepancyFlag::new(
                DiscrepancyKind::ShortDuration,
                DiscrepancySeverity::Medium,
                format!("entry {} is only {hours} hours", entry.id),
                vec![entry.id.clone()],
                false,
            ));
        }
        if hours < Decimal::ZERO {
            flags.push(DiscrepancyFlag::new(
                DiscrepancyKind::NegativeHours,
                DiscrepancySeverity::Critical,
                format!("entry {} has {hours} hours", entry.id),
                vec![entry.id.clone()],
                true,
            ));
        }
        if entry.clock_out < entry.clock_in {
            flags.push(DiscrepancyFlag::new(
                DiscrepancyKind::ClockOutBeforeClockIn,
                DiscrepancySeverity::Critical,
                format!("entry {} clocks out before it clocks in", entry.id),
                vec![entry.id.clone()],
                true,
            ));
        }
    }

    let review_ids: Vec<String> = entries
        .iter()
        .filter(|e| e.requires_review)
        .map(|e| e.id.clone())
        .collect();
    if !review_ids.is_empty() {
        flags.push(DiscrepancyFlag::new(
            DiscrepancyKind::RequiresReview,
            DiscrepancySeverity::Medium,
            format!("{} entries flagged for review upstream", review_ids.len()),
            review_ids,
            false,
        ));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn entry(id: &str, date: &str, clock_in: &str, clock_out: &str, hours: &str) -> TimeSheetEntry {
        TimeSheetEntry {
            id: id.to_string(),
            work_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            clock_in: datetime(clock_in),
            clock_out: datetime(clock_out),
            regular_hours: dec(hours),
            overtime_hours: Decimal::ZERO,
            double_time_hours: Decimal::ZERO,
            break_hours: Decimal::ZERO,
            base_rate: dec("20"),
            multipliers: vec![],
            earnings: dec(hours) * dec("20"),
            requires_review: false,
            service_code: None,
        }
    }

    fn kinds(flags: &[DiscrepancyFlag]) -> Vec<DiscrepancyKind> {
        flags.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_clean_entries_produce_no_flags() {
        let entries = vec![
            entry("e1", "2024-06-03", "2024-06-03 09:00:00", "2024-06-03 17:00:00", "8"),
            entry("e2", "2024-06-04", "2024-06-04 09:00:00", "2024-06-04 17:00:00", "8"),
        ];
        assert!(detect_discrepancies(&entries).is_empty());
    }

    #[test]
    fn test_excessive_period_hours() {
        let mut entries = Vec::new();
        for day in 1..=11 {
            let date = format!("2024-06-{day:02}");
            entries.push(entry(
                &format!("e{day}"),
                &date,
                &format!("{date} 08:00:00"),
                &format!("{date} 16:00:00"),
                "8",
            ));
        }
        // 88 hours in the period
        let flags = detect_discrepancies(&entries);
        assert!(kinds(&flags).contains(&DiscrepancyKind::ExcessivePeriodHours));
        let flag = flags
            .iter()
            .find(|f| f.kind == DiscrepancyKind::ExcessivePeriodHours)
            .unwrap();
        assert_eq!(flag.severity, DiscrepancySeverity::High);
        assert!(flag.requires_resolution);
        assert_eq!(flag.entry_ids.len(), 11);
    }

    #[test]
    fn test_exactly_80_period_hours_not_flagged() {
        let mut entries = Vec::new();
        for day in 1..=10 {
            let date = format!("2024-06-{day:02}");
            entries.push(entry(
                &format!("e{day}"),
                &date,
                &format!("{date} 08:00:00"),
                &format!("{date} 16:00:00"),
                "8",
            ));
        }
        assert!(detect_discrepancies(&entries).is_empty());
    }

    #[test]
    fn test_excessive_daily_hours_sums_across_entries() {
        // Two entries on the same day totalling 17 hours.
        let entries = vec![
            entry("e1", "2024-06-03", "2024-06-03 00:00:00", "2024-06-03 09:00:00", "9"),
            entry("e2", "2024-06-03", "2024-06-03 10:00:00", "2024-06-03 18:00:00", "8"),
        ];
        let flags = detect_discrepancies(&entries);
        let flag = flags
            .iter()
            .find(|f| f.kind == DiscrepancyKind::ExcessiveDailyHours)
            .unwrap();
        assert!(flag.requires_resolution);
        assert_eq!(flag.entry_ids, vec!["e1".to_string(), "e2".to_string()]);
    }

    #[test]
    fn test_overlapping_entries_flagged_as_critical() {
        let entries = vec![
            entry("e1", "2024-06-03", "2024-06-03 09:00:00", "2024-06-03 15:00:00", "6"),
            entry("e2", "2024-06-03", "2024-06-03 14:00:00", "2024-06-03 18:00:00", "4"),
        ];
        let flags = detect_discrepancies(&entries);
        let flag = flags
            .iter()
            .find(|f| f.kind == DiscrepancyKind::OverlappingEntries)
            .unwrap();
        assert_eq!(flag.severity, DiscrepancySeverity::Critical);
        assert_eq!(flag.entry_ids, vec!["e1".to_string(), "e2".to_string()]);
    }

    #[test]
    fn test_overlap_detected_regardless_of_input_order() {
        let entries = vec![
            entry("e2", "2024-06-03", "2024-06-03 14:00:00", "2024-06-03 18:00:00", "4"),
            entry("e1", "2024-06-03", "2024-06-03 09:00:00", "2024-06-03 15:00:00", "6"),
        ];
        let flags = detect_discrepancies(&entries);
        assert!(kinds(&flags).contains(&DiscrepancyKind::OverlappingEntries));
    }

    #[test]
    fn test_adjacent_entries_do_not_overlap() {
        let entries = vec![
            entry("e1", "2024-06-03", "2024-06-03 09:00:00", "2024-06-03 13:00:00", "4"),
            entry("e2", "2024-06-03", "2024-06-03 13:00:00", "2024-06-03 17:00:00", "4"),
        ];
        assert!(detect_discrepancies(&entries).is_empty());
    }

    #[test]
    fn test_long_span_suggests_missing_clock_out() {
        let entries = vec![entry(
            "e1",
            "2024-06-03",
            "2024-06-03 08:00:00",
            "2024-06-04 14:00:00",
            "8",
        )];
        let flags = detect_discrepancies(&entries);
        let flag = flags
            .iter()
            .find(|f| f.kind == DiscrepancyKind::PossibleMissingClockOut)
            .unwrap();
        assert_eq!(flag.severity, DiscrepancySeverity::High);
        assert!(flag.requires_resolution);
    }

    #[test]
    fn test_short_entry_is_medium_and_non_blocking() {
        let entries = vec![entry(
            "e1",
            "2024-06-03",
            "2024-06-03 09:00:00",
            "2024-06-03 09:06:00",
            "0.1",
        )];
        let flags = detect_discrepancies(&entries);
        let flag = flags
            .iter()
            .find(|f| f.kind == DiscrepancyKind::ShortDuration)
            .unwrap();
        assert_eq!(flag.severity, DiscrepancySeverity::Medium);
        assert!(!flag.requires_resolution);
        assert!(!flag.is_blocking());
    }

    #[test]
    fn test_zero_hour_entry_not_flagged_short() {
        let entries = vec![entry(
            "e1",
            "2024-06-03",
            "2024-06-03 09:00:00",
            "2024-06-03 09:00:00",
            "0",
        )];
        assert!(detect_discrepancies(&entries).is_empty());
    }

    #[test]
    fn test_negative_hours_critical() {
        let mut bad = entry("e1", "2024-06-03", "2024-06-03 09:00:00", "2024-06-03 17:00:00", "8");
        bad.regular_hours = dec("-2");
        let flags = detect_discrepancies(&[bad]);
        let flag = flags
            .iter()
            .find(|f| f.kind == DiscrepancyKind::NegativeHours)
            .unwrap();
        assert_eq!(flag.severity, DiscrepancySeverity::Critical);
        assert!(flag.requires_resolution);
    }

    #[test]
    fn test_inverted_punches_critical() {
        let entries = vec![entry(
            "e1",
            "2024-06-03",
            "2024-06-03 17:00:00",
            "2024-06-03 09:00:00",
            "8",
        )];
        let flags = detect_discrepancies(&entries);
        assert!(kinds(&flags).contains(&DiscrepancyKind::ClockOutBeforeClockIn));
    }

    #[test]
    fn test_requires_review_entries_aggregate_into_one_flag() {
        let mut e1 = entry("e1", "2024-06-03", "2024-06-03 09:00:00", "2024-06-03 17:00:00", "8");
        let mut e2 = entry("e2", "2024-06-04", "2024-06-04 09:00:00", "2024-06-04 17:00:00", "8");
        e1.requires_review = true;
        e2.requires_review = true;
        let flags = detect_discrepancies(&[e1, e2]);
        assert_eq!(flags.len(), 1);
        let flag = &flags[0];
        assert_eq!(flag.kind, DiscrepancyKind::RequiresReview);
        assert_eq!(flag.entry_ids.len(), 2);
        assert!(!flag.requires_resolution);
    }

    #[test]
    fn test_empty_entries_no_flags() {
        assert!(detect_discrepancies(&[]).is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_PERIOD_HOURS, dec("80"));
        assert_eq!(MAX_DAILY_HOURS, dec("16"));
        assert_eq!(MAX_ENTRY_SPAN_HOURS, dec("24"));
        assert_eq!(MIN_ENTRY_HOURS, dec("0.25"));
    }
}
