// src/lib.rs
//! Attendance and working-hours compliance metrics.
//!
//! The engine consumes a raw daily attendance export and reports, per
//! employee and for the team as a whole, how many expected working days and
//! hours were met at weekly (ISO calendar) and monthly granularity. Weekends,
//! public holidays and approved absences are excluded from the expected
//! baseline.
//!
//! The computation itself ([`metrics::analyze`]) is pure and in-memory; file
//! ingestion ([`ingest`]) and CSV/JSON export ([`export`]) are thin
//! collaborators around it.

pub mod attendance;
pub mod config;
pub mod error;
pub mod export;
pub mod holiday_calendar;
pub mod ingest;
pub mod metrics;
pub mod working_days;

pub use attendance::{AttendanceRecord, ParseStats, RawAttendanceRow};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use holiday_calendar::{Country, HolidayCalendar};
pub use metrics::{analyze, AttendanceReport};

#[cfg(test)]
mod attendance_tests;
