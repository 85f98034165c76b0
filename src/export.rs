// src/export.rs
use std::fs::{self, File};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::AnalyzerError;
use crate::metrics::AttendanceReport;

/// Writes the four result tables as CSV files into `dir` (created if
/// missing). Undefined percentages come out as blank cells.
pub fn write_report_csvs(report: &AttendanceReport, dir: &Path) -> Result<(), AnalyzerError> {
    fs::create_dir_all(dir)?;
    write_table(&report.summary_by_month, &dir.join("summary_month.csv"))?;
    write_table(&report.person_by_month, &dir.join("person_month.csv"))?;
    write_table(&report.person_by_week, &dir.join("person_week.csv"))?;
    write_table(&report.team_by_week, &dir.join("team_week.csv"))?;
    info!("Wrote report tables to {}", dir.display());
    Ok(())
}

/// Dumps the whole report (tables plus parse statistics) as pretty JSON.
pub fn write_report_json(report: &AttendanceReport, path: &Path) -> Result<(), AnalyzerError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    info!("Wrote JSON report to {}", path.display());
    Ok(())
}

fn write_table<T: Serialize>(rows: &[T], path: &Path) -> Result<(), AnalyzerError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
