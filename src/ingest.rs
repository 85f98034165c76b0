// src/ingest.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::attendance::RawAttendanceRow;
use crate::error::AnalyzerError;

/// Columns the export must provide, with their exact source names.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Employee name",
    "Attendance date",
    "Total time worked decimal value",
    "Event",
];

/// Reads an attendance export (CSV) from disk.
pub fn read_attendance_csv(path: &Path) -> Result<Vec<RawAttendanceRow>, AnalyzerError> {
    info!("Reading attendance export from {}", path.display());
    let file = File::open(path)?;
    let rows = read_attendance(file)?;
    info!("Read {} raw rows", rows.len());
    Ok(rows)
}

/// Reads an attendance export from any reader. Fails with
/// [`AnalyzerError::MissingColumns`] naming every absent required column
/// before touching any row.
pub fn read_attendance<R: Read>(reader: R) -> Result<Vec<RawAttendanceRow>, AnalyzerError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalyzerError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
