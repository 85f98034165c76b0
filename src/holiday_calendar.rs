// src/holiday_calendar.rs
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::AnalyzerError;

/// Countries with a supported public-holiday rule set. One calendar applies
/// to the whole team (no per-employee calendars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Estonia,
    Finland,
    Sweden,
    Germany,
}

impl Country {
    /// Resolves an ISO-3166 alpha-2 code, case-insensitively.
    pub fn from_code(code: &str) -> Result<Self, AnalyzerError> {
        match code.trim().to_uppercase().as_str() {
            "EE" => Ok(Country::Estonia),
            "FI" => Ok(Country::Finland),
            "SE" => Ok(Country::Sweden),
            "DE" => Ok(Country::Germany),
            other => Err(AnalyzerError::Configuration(format!(
                "unrecognized country code '{other}' (supported: EE, FI, SE, DE)"
            ))),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Country::Estonia => "EE",
            Country::Finland => "FI",
            Country::Sweden => "SE",
            Country::Germany => "DE",
        }
    }

    /// Public holidays of `year`, including those falling on weekends.
    /// Weekend holidays are harmless downstream: the working-day math only
    /// ever looks at Monday–Friday dates.
    fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate> {
        let easter = easter_sunday(year);
        match self {
            Country::Estonia => vec![
                // New Year's Day
                ymd(year, 1, 1),
                // Independence Day
                ymd(year, 2, 24),
                // Good Friday
                easter - Duration::days(2),
                // Easter Sunday
                easter,
                // Spring Day
                ymd(year, 5, 1),
                // Whit Sunday
                easter + Duration::days(49),
                // Victory Day
                ymd(year, 6, 23),
                // Midsummer Day
                ymd(year, 6, 24),
                // Day of Restoration of Independence
                ymd(year, 8, 20),
                // Christmas Eve
                ymd(year, 12, 24),
                // Christmas Day
                ymd(year, 12, 25),
                // Boxing Day
                ymd(year, 12, 26),
            ],
            Country::Finland => vec![
                // New Year's Day
                ymd(year, 1, 1),
                // Epiphany
                ymd(year, 1, 6),
                // Good Friday
                easter - Duration::days(2),
                // Easter Monday
                easter + Duration::days(1),
                // May Day
                ymd(year, 5, 1),
                // Ascension Thursday
                easter + Duration::days(39),
                // Midsummer Eve (Friday between Jun 19–25)
                friday_between(year, 6, 19, 25),
                // Independence Day
                ymd(year, 12, 6),
                // Christmas Eve
                ymd(year, 12, 24),
                // Christmas Day
                ymd(year, 12, 25),
                // Boxing Day
                ymd(year, 12, 26),
            ],
            Country::Sweden => vec![
                // New Year's Day
                ymd(year, 1, 1),
                // Epiphany
                ymd(year, 1, 6),
                // Good Friday
                easter - Duration::days(2),
                // Easter Monday
                easter + Duration::days(1),
                // Labour Day
                ymd(year, 5, 1),
                // Ascension Thursday
                easter + Duration::days(39),
                // National Day
                ymd(year, 6, 6),
                // Midsummer Eve (Friday between Jun 19–25)
                friday_between(year, 6, 19, 25),
                // Christmas Eve
                ymd(year, 12, 24),
                // Christmas Day
                ymd(year, 12, 25),
                // Boxing Day
                ymd(year, 12, 26),
                // New Year's Eve
                ymd(year, 12, 31),
            ],
            Country::Germany => vec![
                // New Year's Day
                ymd(year, 1, 1),
                // Good Friday
                easter - Duration::days(2),
                // Easter Monday
                easter + Duration::days(1),
                // Labour Day
                ymd(year, 5, 1),
                // Ascension Thursday
                easter + Duration::days(39),
                // Whit Monday
                easter + Duration::days(50),
                // Day of German Unity
                ymd(year, 10, 3),
                // Christmas Day
                ymd(year, 12, 25),
                // Boxing Day
                ymd(year, 12, 26),
            ],
        }
    }
}

/// Holiday lookups for one configured country, cached per year. The cache is
/// populated once per distinct year and read-only afterwards.
#[derive(Debug)]
pub struct HolidayCalendar {
    country: Country,
    cache: Mutex<HashMap<i32, Vec<NaiveDate>>>,
}

impl HolidayCalendar {
    pub fn new(country: Country) -> Self {
        Self {
            country,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn country(&self) -> Country {
        self.country
    }

    /// Union of public holidays across `years`. An empty year set yields an
    /// empty holiday set.
    pub fn holidays_for_years<I>(&self, years: I) -> HashSet<NaiveDate>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut cache = self.cache.lock().unwrap();
        let mut holidays = HashSet::new();
        for year in years {
            let dates = cache
                .entry(year)
                .or_insert_with(|| self.country.holidays_in_year(year));
            holidays.extend(dates.iter().copied());
        }
        holidays
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixed holiday date is valid")
}

/// The Friday within `[lo, hi]` of the given month (midsummer-eve rule).
fn friday_between(year: i32, month: u32, lo: u32, hi: u32) -> NaiveDate {
    (lo..=hi)
        .map(|day| ymd(year, month, day))
        .find(|d| d.weekday() == Weekday::Fri)
        .expect("a seven-day span contains a Friday")
}

/// Easter Sunday of `year` in the Gregorian calendar (anonymous computus).
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).expect("computus yields a valid date")
}
