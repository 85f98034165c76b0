// src/attendance.rs
use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::working_days::is_weekday;

/// Dates arrive as day-first strings, e.g. `07.03.2025`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// One row of the attendance export, exactly as the ingestion collaborator
/// hands it over (spec'd column names, all values still strings).
#[derive(Debug, Clone, Deserialize)]
pub struct RawAttendanceRow {
    #[serde(rename = "Employee name")]
    pub employee: String,
    #[serde(rename = "Attendance date")]
    pub date: String,
    #[serde(rename = "Total time worked decimal value", default)]
    pub hours: String,
    #[serde(rename = "Event", default)]
    pub event: String,
}

/// A normalized attendance record. `is_absence` is computed on the raw event
/// text *before* any calendar filtering, so vacation days stay countable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub employee: String,
    pub date: NaiveDate,
    pub hours_worked: Decimal,
    pub present: bool,
    pub is_absence: bool,
}

/// Per-row issues recovered during normalization. Non-fatal; surfaced to the
/// caller for visibility instead of being logged away inside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Rows in the raw input.
    pub total_rows: usize,
    /// Rows dropped because the date failed to parse.
    pub bad_date_rows: usize,
    /// Rows dropped because the employee name was blank.
    pub blank_employee_rows: usize,
    /// Rows dropped by the weekend/holiday filter.
    pub off_calendar_rows: usize,
}

impl ParseStats {
    pub fn dropped(&self) -> usize {
        self.bad_date_rows + self.blank_employee_rows + self.off_calendar_rows
    }
}

/// Case-insensitive substring match of the event text against the configured
/// keyword list (keywords are already lower-cased).
pub fn is_absence_event(event: &str, keywords: &[String]) -> bool {
    let text = event.to_lowercase();
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

/// Parses raw rows into [`AttendanceRecord`]s without applying the calendar
/// filter. Rows with unparseable dates or blank employee names are dropped
/// and counted in the returned [`ParseStats`]; hours parse leniently
/// (blank/non-numeric becomes 0.0, never an error).
pub fn parse_rows(
    raw_rows: &[RawAttendanceRow],
    absence_keywords: &[String],
) -> (Vec<AttendanceRecord>, ParseStats) {
    let mut stats = ParseStats {
        total_rows: raw_rows.len(),
        ..ParseStats::default()
    };
    let mut records = Vec::with_capacity(raw_rows.len());

    for row in raw_rows {
        let employee = row.employee.trim();
        if employee.is_empty() {
            stats.blank_employee_rows += 1;
            continue;
        }
        let date = match NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                stats.bad_date_rows += 1;
                continue;
            }
        };
        let hours_worked = parse_hours(&row.hours);
        records.push(AttendanceRecord {
            employee: employee.to_string(),
            date,
            hours_worked,
            present: hours_worked > Decimal::ZERO,
            is_absence: is_absence_event(&row.event, absence_keywords),
        });
    }

    (records, stats)
}

/// Removes weekend and public-holiday records. Runs after absence
/// classification; a weekend/holiday absence is excluded from *both* the
/// vacation tally and the working-day baseline, which keeps numerator and
/// denominator consistent.
pub fn filter_to_working_calendar(
    records: Vec<AttendanceRecord>,
    holidays: &HashSet<NaiveDate>,
    stats: &mut ParseStats,
) -> Vec<AttendanceRecord> {
    let before = records.len();
    let kept: Vec<AttendanceRecord> = records
        .into_iter()
        .filter(|r| is_weekday(r.date) && !holidays.contains(&r.date))
        .collect();
    stats.off_calendar_rows += before - kept.len();
    kept
}

fn parse_hours(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(trimmed) {
        Ok(value) if value >= Decimal::ZERO => value,
        _ => Decimal::ZERO,
    }
}
