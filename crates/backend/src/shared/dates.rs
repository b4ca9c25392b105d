//! Calendar helpers.
//!
//! All comparisons are on local calendar dates. Source dates such as
//! `2026-02-04T00:00:00.000Z` are read as the date written in the string, never
//! shifted through UTC, so a purchase made on the 4th stays on the 4th.

use chrono::{Datelike, Local, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS...` (time ignored) or `DD/MM/YYYY`
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('/') {
        return NaiveDate::parse_from_str(s.split_whitespace().next()?, "%d/%m/%Y").ok();
    }

    let date_part = s.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whole days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Short Portuguese month name, empty for an invalid month
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((first, last))
}

/// The month before `(year, month)`; January rolls back to December
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Date format expected by the remote API (`DD/MM/YYYY`)
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn current_year() -> i32 {
    today().year()
}
