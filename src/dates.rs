//! Calendar helpers for the monthly simulation loop

use chrono::{Datelike, Months, NaiveDate};

/// Build a date from components known to be valid at the call site.
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// First day of the month following `date`.
pub(crate) fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    ymd(date.year(), date.month(), 1) + Months::new(1)
}

/// Number of days in the month containing `date`.
pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    let first = ymd(date.year(), date.month(), 1);
    (first + Months::new(1))
        .pred_opt()
        .expect("previous day of a first-of-month")
        .day()
}

/// `date` advanced by a whole number of years.
pub(crate) fn years_after(date: NaiveDate, years: u32) -> NaiveDate {
    date + Months::new(12 * years)
}
