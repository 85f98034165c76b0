// src/working_days.rs
use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of business days (Mon–Fri, not in `holidays`) in `[start, end]`
/// inclusive. An inverted range counts as empty.
pub fn business_days(start: NaiveDate, end: NaiveDate, holidays: &HashSet<NaiveDate>) -> u32 {
    let mut count = 0;
    let mut day = start;
    while day <= end {
        if is_weekday(day) && !holidays.contains(&day) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

pub fn working_days_in_month(year: i32, month: u32, holidays: &HashSet<NaiveDate>) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("month key comes from a real date");
    let last = last_day_of_month(year, month);
    business_days(first, last, holidays)
}

/// Working days of an ISO week. The week spans Monday–Sunday, but only the
/// Monday–Friday subset can contribute, so the range is exactly five days.
pub fn working_days_in_iso_week(iso_year: i32, iso_week: u32, holidays: &HashSet<NaiveDate>) -> u32 {
    let monday = NaiveDate::from_isoywd_opt(iso_year, iso_week, Weekday::Mon)
        .expect("week key comes from a real date");
    business_days(monday, monday + Duration::days(4), holidays)
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .expect("month key comes from a real date")
        .pred_opt()
        .expect("date has a predecessor")
}
