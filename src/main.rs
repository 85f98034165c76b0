// src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use attendance_core::config::parse_keywords;
use attendance_core::export::{write_report_csvs, write_report_json};
use attendance_core::ingest::read_attendance_csv;
use attendance_core::metrics::{analyze, AttendanceReport};
use attendance_core::{AnalyzerConfig, Country, HolidayCalendar};

/// Computes attendance and working-hours compliance metrics for a team from
/// a raw daily attendance export.
#[derive(Debug, Parser)]
#[command(name = "attendance-core", version)]
struct Cli {
    /// Attendance export file (CSV).
    input: PathBuf,

    /// ISO-3166 alpha-2 holiday calendar country (e.g. EE, FI, SE, DE).
    #[arg(long)]
    country: Option<String>,

    /// Expected hours per working day.
    #[arg(long)]
    daily_hours: Option<Decimal>,

    /// Comma-separated absence keywords (case-insensitive substrings).
    #[arg(long)]
    absence_keywords: Option<String>,

    /// Write the four result tables as CSV files into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Write the whole report as pretty JSON to this file.
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    // --- Setup ---
    dotenv::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    // --- Configuration: environment first, CLI flags override ---
    let mut config = AnalyzerConfig::from_env().context("loading configuration")?;
    if let Some(code) = &cli.country {
        config.country = Country::from_code(code)?;
    }
    if let Some(hours) = cli.daily_hours {
        config.daily_expected_hours = hours;
    }
    if let Some(raw) = &cli.absence_keywords {
        config.absence_keywords = parse_keywords(raw);
    }
    config.validate()?;
    info!(
        "Configuration: country={}, daily hours={}, {} absence keywords",
        config.country.code(),
        config.daily_expected_hours,
        config.absence_keywords.len()
    );

    // --- Pipeline ---
    let raw_rows = read_attendance_csv(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let calendar = HolidayCalendar::new(config.country);
    let report = analyze(&raw_rows, &config, &calendar).context("computing attendance metrics")?;

    if report.parse_stats.dropped() > 0 {
        warn!(
            "Dropped rows: {} bad dates, {} blank employee names, {} weekend/holiday",
            report.parse_stats.bad_date_rows,
            report.parse_stats.blank_employee_rows,
            report.parse_stats.off_calendar_rows
        );
    }

    render(&report, &config);

    // --- Optional exports ---
    if let Some(dir) = &cli.export_dir {
        write_report_csvs(&report, dir)?;
    }
    if let Some(path) = &cli.json_out {
        write_report_json(&report, path)?;
    }

    Ok(())
}

fn render(report: &AttendanceReport, config: &AnalyzerConfig) {
    println!("Monthly snapshot");
    println!("  month          workdays  team  vac-pd  presence  hours");
    for row in &report.summary_by_month {
        println!(
            "  {:<14} {:>8} {:>5} {:>7} {:>9} {:>6}",
            row.month_label,
            row.working_days,
            row.team_size,
            row.vacation_person_days,
            fmt_pct(row.team_presence_pct, config.low_pct_threshold),
            fmt_pct(row.team_hours_pct, config.low_pct_threshold),
        );
    }

    println!("\nPer person (month)");
    println!("  month    employee              office  vac  expected  presence  hours");
    for row in &report.person_by_month {
        println!(
            "  {:>4}-{:02} {:<20} {:>7} {:>4} {:>9} {:>9} {:>6}",
            row.year,
            row.month,
            row.employee,
            row.days_in_office,
            row.vacation_days,
            row.expected_days,
            fmt_pct(row.pct_working_days, config.low_pct_threshold),
            fmt_pct(row.pct_hours, config.low_pct_threshold),
        );
    }

    println!("\nPer person (ISO week)");
    println!("  week       employee              office  vac  expected  presence  hours");
    for row in &report.person_by_week {
        println!(
            "  {:<10} {:<20} {:>7} {:>4} {:>9} {:>9} {:>6}",
            row.year_week(),
            row.employee,
            row.days_in_office,
            row.vacation_days,
            row.expected_days,
            fmt_pct(row.pct_working_days, config.low_pct_threshold),
            fmt_pct(row.pct_hours, config.low_pct_threshold),
        );
    }

    println!("\nTeam (ISO week)");
    println!("  week       person-days  team  vac-pd  presence  hours");
    for row in &report.team_by_week {
        println!(
            "  {:<10} {:>11} {:>5} {:>7} {:>9} {:>6}",
            row.year_week(),
            row.person_days,
            row.team_size,
            row.vacation_person_days,
            fmt_pct(row.team_presence_pct, config.low_pct_threshold),
            fmt_pct(row.team_hours_pct, config.low_pct_threshold),
        );
    }
}

/// Formats a ratio as a whole-number percentage; undefined values render as
/// `-`, values below the configured threshold get a `!` marker.
fn fmt_pct(value: Option<Decimal>, threshold: Decimal) -> String {
    match value {
        None => "-".to_string(),
        Some(ratio) => {
            let percent = (ratio * Decimal::from(100)).round();
            if ratio < threshold {
                format!("{percent}%!")
            } else {
                format!("{percent}%")
            }
        }
    }
}
