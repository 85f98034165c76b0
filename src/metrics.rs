// src/metrics.rs
//! The aggregation engine: turns normalized attendance records into the four
//! result tables (person × month, person × ISO week, team × ISO week,
//! team × month). Pure and deterministic; identical input and configuration
//! produce identical tables.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::attendance::{filter_to_working_calendar, parse_rows, AttendanceRecord, ParseStats, RawAttendanceRow};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::holiday_calendar::HolidayCalendar;
use crate::working_days::{working_days_in_iso_week, working_days_in_month};

// --- Result Tables ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonWeekRow {
    pub iso_year: i32,
    pub iso_week: u32,
    pub employee: String,
    pub days_in_office: u32,
    pub actual_hours: Decimal,
    pub vacation_days: u32,
    pub working_days: u32,
    pub expected_days: i64,
    pub expected_hours: Decimal,
    /// `[0, 1]` ratio rounded to 2 dp; `None` when `expected_days <= 0`.
    pub pct_working_days: Option<Decimal>,
    pub pct_hours: Option<Decimal>,
}

impl PersonWeekRow {
    /// Label such as `2025-W07`.
    pub fn year_week(&self) -> String {
        format!("{}-W{:02}", self.iso_year, self.iso_week)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonMonthRow {
    pub year: i32,
    pub month: u32,
    pub employee: String,
    pub days_in_office: u32,
    pub actual_hours: Decimal,
    pub vacation_days: u32,
    pub working_days: u32,
    pub expected_days: i64,
    pub expected_hours: Decimal,
    pub pct_working_days: Option<Decimal>,
    pub pct_hours: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWeekRow {
    pub iso_year: i32,
    pub iso_week: u32,
    /// Sum of present records across every employee active in the week.
    pub person_days: u32,
    pub actual_team_hours: Decimal,
    /// Distinct employees with at least one record in this week.
    pub team_size: u32,
    pub vacation_person_days: u32,
    pub working_days: u32,
    pub expected_person_days: i64,
    pub expected_team_hours: Decimal,
    pub team_presence_pct: Option<Decimal>,
    pub team_hours_pct: Option<Decimal>,
}

impl TeamWeekRow {
    pub fn year_week(&self) -> String {
        format!("{}-W{:02}", self.iso_year, self.iso_week)
    }
}

/// Team roll-up per calendar month; one row per distinct (year, month) in the
/// data, not only the most recent month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMonthRow {
    pub year: i32,
    pub month: u32,
    /// Label such as `March 2025`.
    pub month_label: String,
    pub person_days: u32,
    pub actual_team_hours: Decimal,
    pub team_size: u32,
    pub vacation_person_days: u32,
    pub working_days: u32,
    pub expected_person_days: i64,
    pub expected_team_hours: Decimal,
    pub team_presence_pct: Option<Decimal>,
    pub team_hours_pct: Option<Decimal>,
}

/// Everything the engine produces for one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub summary_by_month: Vec<TeamMonthRow>,
    pub person_by_month: Vec<PersonMonthRow>,
    pub person_by_week: Vec<PersonWeekRow>,
    pub team_by_week: Vec<TeamWeekRow>,
    pub parse_stats: ParseStats,
}

// --- Pipeline ---

/// Full engine pipeline: parse raw rows, derive the holiday set from the
/// years present in the data, filter to the working calendar, aggregate.
///
/// Fails with [`AnalyzerError::NoValidData`] when nothing survives parsing or
/// filtering; per-row issues only show up in the report's `parse_stats`.
pub fn analyze(
    raw_rows: &[RawAttendanceRow],
    config: &AnalyzerConfig,
    calendar: &HolidayCalendar,
) -> Result<AttendanceReport, AnalyzerError> {
    let (parsed, mut stats) = parse_rows(raw_rows, &config.absence_keywords);
    if parsed.is_empty() {
        return Err(AnalyzerError::NoValidData);
    }

    let years: BTreeSet<i32> = parsed.iter().map(|r| r.date.year()).collect();
    let holidays = calendar.holidays_for_years(years);

    let records = filter_to_working_calendar(parsed, &holidays, &mut stats);
    if records.is_empty() {
        return Err(AnalyzerError::NoValidData);
    }

    let mut report = aggregate(&records, &holidays, config);
    report.parse_stats = stats;
    Ok(report)
}

// --- Aggregation ---

#[derive(Debug, Default, Clone)]
struct PersonAccum {
    days_in_office: u32,
    actual_hours: Decimal,
    vacation_dates: BTreeSet<NaiveDate>,
}

impl PersonAccum {
    fn add(&mut self, record: &AttendanceRecord) {
        if record.present {
            self.days_in_office += 1;
        }
        self.actual_hours += record.hours_worked;
        if record.is_absence {
            self.vacation_dates.insert(record.date);
        }
    }
}

#[derive(Debug, Default, Clone)]
struct TeamAccum {
    person_days: u32,
    actual_hours: Decimal,
    employees: BTreeSet<String>,
    vacation_person_days: u32,
}

/// Consumes filtered records and produces the four tables. Working-day
/// counts are computed once per distinct unit; units with zero records are
/// never synthesized. Rows come out sorted by (unit, employee).
pub fn aggregate(
    records: &[AttendanceRecord],
    holidays: &HashSet<NaiveDate>,
    config: &AnalyzerConfig,
) -> AttendanceReport {
    let mut by_person_week: BTreeMap<(i32, u32, String), PersonAccum> = BTreeMap::new();
    let mut by_person_month: BTreeMap<(i32, u32, String), PersonAccum> = BTreeMap::new();

    for record in records {
        let iso = record.date.iso_week();
        by_person_week
            .entry((iso.year(), iso.week(), record.employee.clone()))
            .or_default()
            .add(record);
        by_person_month
            .entry((record.date.year(), record.date.month(), record.employee.clone()))
            .or_default()
            .add(record);
    }

    // Memoized working days per distinct unit.
    let mut week_days: HashMap<(i32, u32), u32> = HashMap::new();
    let mut month_days: HashMap<(i32, u32), u32> = HashMap::new();

    let mut person_by_week = Vec::with_capacity(by_person_week.len());
    let mut team_week_acc: BTreeMap<(i32, u32), TeamAccum> = BTreeMap::new();
    for ((iso_year, iso_week, employee), accum) in &by_person_week {
        let working_days = *week_days
            .entry((*iso_year, *iso_week))
            .or_insert_with(|| working_days_in_iso_week(*iso_year, *iso_week, holidays));
        let vacation_days = accum.vacation_dates.len() as u32;
        let expected_days = i64::from(working_days) - i64::from(vacation_days);
        let expected_hours = Decimal::from(expected_days) * config.daily_expected_hours;

        person_by_week.push(PersonWeekRow {
            iso_year: *iso_year,
            iso_week: *iso_week,
            employee: employee.clone(),
            days_in_office: accum.days_in_office,
            actual_hours: accum.actual_hours,
            vacation_days,
            working_days,
            expected_days,
            expected_hours,
            pct_working_days: pct(Decimal::from(accum.days_in_office), Decimal::from(expected_days)),
            pct_hours: pct(accum.actual_hours, expected_hours),
        });

        let team = team_week_acc.entry((*iso_year, *iso_week)).or_default();
        team.person_days += accum.days_in_office;
        team.actual_hours += accum.actual_hours;
        team.employees.insert(employee.clone());
        team.vacation_person_days += vacation_days;
    }

    let mut person_by_month = Vec::with_capacity(by_person_month.len());
    let mut team_month_acc: BTreeMap<(i32, u32), TeamAccum> = BTreeMap::new();
    for ((year, month, employee), accum) in &by_person_month {
        let working_days = *month_days
            .entry((*year, *month))
            .or_insert_with(|| working_days_in_month(*year, *month, holidays));
        let vacation_days = accum.vacation_dates.len() as u32;
        let expected_days = i64::from(working_days) - i64::from(vacation_days);
        let expected_hours = Decimal::from(expected_days) * config.daily_expected_hours;

        person_by_month.push(PersonMonthRow {
            year: *year,
            month: *month,
            employee: employee.clone(),
            days_in_office: accum.days_in_office,
            actual_hours: accum.actual_hours,
            vacation_days,
            working_days,
            expected_days,
            expected_hours,
            pct_working_days: pct(Decimal::from(accum.days_in_office), Decimal::from(expected_days)),
            pct_hours: pct(accum.actual_hours, expected_hours),
        });

        let team = team_month_acc.entry((*year, *month)).or_default();
        team.person_days += accum.days_in_office;
        team.actual_hours += accum.actual_hours;
        team.employees.insert(employee.clone());
        team.vacation_person_days += vacation_days;
    }

    let team_by_week = team_week_acc
        .into_iter()
        .map(|((iso_year, iso_week), team)| {
            let working_days = week_days[&(iso_year, iso_week)];
            let (expected_person_days, expected_team_hours, presence_pct, hours_pct) =
                team_expectations(&team, working_days, config);
            TeamWeekRow {
                iso_year,
                iso_week,
                person_days: team.person_days,
                actual_team_hours: team.actual_hours,
                team_size: team.employees.len() as u32,
                vacation_person_days: team.vacation_person_days,
                working_days,
                expected_person_days,
                expected_team_hours,
                team_presence_pct: presence_pct,
                team_hours_pct: hours_pct,
            }
        })
        .collect();

    let summary_by_month = team_month_acc
        .into_iter()
        .map(|((year, month), team)| {
            let working_days = month_days[&(year, month)];
            let (expected_person_days, expected_team_hours, presence_pct, hours_pct) =
                team_expectations(&team, working_days, config);
            TeamMonthRow {
                year,
                month,
                month_label: month_label(year, month),
                person_days: team.person_days,
                actual_team_hours: team.actual_hours,
                team_size: team.employees.len() as u32,
                vacation_person_days: team.vacation_person_days,
                working_days,
                expected_person_days,
                expected_team_hours,
                team_presence_pct: presence_pct,
                team_hours_pct: hours_pct,
            }
        })
        .collect();

    AttendanceReport {
        summary_by_month,
        person_by_month,
        person_by_week,
        team_by_week,
        parse_stats: ParseStats::default(),
    }
}

fn team_expectations(
    team: &TeamAccum,
    working_days: u32,
    config: &AnalyzerConfig,
) -> (i64, Decimal, Option<Decimal>, Option<Decimal>) {
    // Team size is per-unit: only employees with records in the unit count
    // toward the expected baseline.
    let expected_person_days = i64::from(working_days) * team.employees.len() as i64
        - i64::from(team.vacation_person_days);
    let expected_team_hours = Decimal::from(expected_person_days) * config.daily_expected_hours;
    let presence_pct = pct(Decimal::from(team.person_days), Decimal::from(expected_person_days));
    let hours_pct = pct(team.actual_hours, expected_team_hours);
    (expected_person_days, expected_team_hours, presence_pct, hours_pct)
}

/// Percentage-of-expectation ratio, rounded to 2 dp. A non-positive
/// denominator yields the undefined sentinel (`None`), never an error or a
/// negative value.
fn pct(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        None
    } else {
        Some((numerator / denominator).round_dp(2))
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("month key comes from a real date")
        .format("%B %Y")
        .to_string()
}
