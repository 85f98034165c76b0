// src/attendance_tests.rs

#[cfg(test)]
mod tests {
    use crate::attendance::*;
    use crate::config::AnalyzerConfig;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    // Helper to build a raw export row.
    fn raw(employee: &str, date: &str, hours: &str, event: &str) -> RawAttendanceRow {
        RawAttendanceRow {
            employee: employee.to_string(),
            date: date.to_string(),
            hours: hours.to_string(),
            event: event.to_string(),
        }
    }

    fn keywords() -> Vec<String> {
        AnalyzerConfig::default().absence_keywords
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_first_dates_and_decimal_hours() {
        let rows = vec![raw("Alice", "07.03.2025", "7.75", "")];
        let (records, stats) = parse_rows(&rows, &keywords());
        assert_eq!(stats.total_rows, 1);
        assert_eq!(stats.dropped(), 0);
        assert_eq!(records[0].date, date(2025, 3, 7));
        assert_eq!(records[0].hours_worked, dec!(7.75));
        assert!(records[0].present);
        assert!(!records[0].is_absence);
    }

    #[test]
    fn unparseable_dates_are_dropped_and_counted() {
        let rows = vec![
            raw("Alice", "2025-03-07", "8.0", ""), // wrong format
            raw("Alice", "31.02.2025", "8.0", ""), // impossible date
            raw("Alice", "07.03.2025", "8.0", ""),
        ];
        let (records, stats) = parse_rows(&rows, &keywords());
        assert_eq!(records.len(), 1);
        assert_eq!(stats.bad_date_rows, 2);
    }

    #[test]
    fn blank_employee_rows_are_dropped() {
        let rows = vec![raw("  ", "07.03.2025", "8.0", "")];
        let (records, stats) = parse_rows(&rows, &keywords());
        assert!(records.is_empty());
        assert_eq!(stats.blank_employee_rows, 1);
    }

    #[test]
    fn hours_parse_leniently_to_zero() {
        for bad in ["", "   ", "n/a", "7,5", "-3"] {
            let rows = vec![raw("Alice", "07.03.2025", bad, "")];
            let (records, _) = parse_rows(&rows, &keywords());
            assert_eq!(records[0].hours_worked, dec!(0), "input '{bad}'");
            assert!(!records[0].present, "input '{bad}'");
        }
    }

    #[test]
    fn absence_matching_is_case_insensitive_substring() {
        let keywords = keywords();
        assert!(is_absence_event("Vacation – Summer Trip", &keywords));
        assert!(is_absence_event("VACATION", &keywords));
        assert!(is_absence_event("vacation", &keywords));
        assert!(is_absence_event("Half-day Sick Leave (approved)", &keywords));
        assert!(!is_absence_event("Sick note", &keywords));
        assert!(!is_absence_event("", &keywords));
        assert!(!is_absence_event("Office day", &keywords));
    }

    #[test]
    fn row_matching_multiple_keywords_counts_once() {
        let rows = vec![raw("Alice", "07.03.2025", "0", "Annual leave / vacation")];
        let (records, _) = parse_rows(&rows, &keywords());
        assert_eq!(records.len(), 1);
        assert!(records[0].is_absence);
    }

    #[test]
    fn weekend_and_holiday_rows_are_filtered_after_classification() {
        let holidays: HashSet<_> = [date(2025, 6, 23)].into(); // Monday, Victory Day
        let rows = vec![
            raw("Alice", "21.06.2025", "4.0", ""),         // Saturday
            raw("Alice", "23.06.2025", "0", "Vacation"),   // holiday, absence
            raw("Alice", "24.06.2025", "8.0", ""),         // holiday in EE; not in this set
        ];
        let (records, mut stats) = parse_rows(&rows, &keywords());
        // Classification happens on the full set.
        assert!(records[1].is_absence);

        let kept = filter_to_working_calendar(records, &holidays, &mut stats);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, date(2025, 6, 24));
        assert_eq!(stats.off_calendar_rows, 2);
    }

    #[test]
    fn absence_on_weekend_or_holiday_counts_nowhere() {
        // A vacation row on a Saturday survives classification but not the
        // filter, so it can never reach the vacation tally.
        let rows = vec![raw("Alice", "22.03.2025", "0", "Vacation")];
        let (records, mut stats) = parse_rows(&rows, &keywords());
        assert!(records[0].is_absence);
        let kept = filter_to_working_calendar(records, &HashSet::new(), &mut stats);
        assert!(kept.is_empty());
        assert_eq!(stats.off_calendar_rows, 1);
    }
}
