use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::HorizonError;

/// Parses a `YYYY-MM-DD` string from calendar fields only.
///
/// The shape is checked byte by byte; timezone-aware parsing never happens,
/// so the result is the same calendar day on every host.
pub fn parse_ymd(raw: &str) -> Result<NaiveDate, HorizonError> {
    let invalid = || HorizonError::InvalidDate(raw.to_string());
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let field = |range: std::ops::Range<usize>| -> Result<u32, HorizonError> {
        let part = &raw[range];
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse::<u32>().map_err(|_| invalid())
    };
    let year = field(0..4)?;
    let month = field(5..7)?;
    let day = field(8..10)?;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of `date` (23:59:59.999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Like [`clamped_date`], but `None` when the year is outside chrono's range.
pub fn try_clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Builds `year-month-day`, clamping `day` to the length of the month.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    try_clamped_date(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Moves `date` by whole months, keeping its day where the target month allows.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    shift_month_with_day(date, months, date.day())
}

/// Moves `date` by whole months and lands on `day`, clamped to the target
/// month's length.
pub fn shift_month_with_day(date: NaiveDate, months: i32, day: u32) -> NaiveDate {
    shift_months_saturating(date, i64::from(months), day)
}

/// Month shift that pins to [`NaiveDate::MAX`] or [`NaiveDate::MIN`] when the
/// target lies outside the representable calendar.
pub fn shift_months_saturating(date: NaiveDate, months: i64, day: u32) -> NaiveDate {
    let saturated = if months >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    };
    let index = i64::from(date.year()) * 12 + i64::from(date.month0());
    let Some(index) = index.checked_add(months) else {
        return saturated;
    };
    let month = index.rem_euclid(12) as u32 + 1;
    i32::try_from(index.div_euclid(12))
        .ok()
        .and_then(|year| try_clamped_date(year, month, day))
        .unwrap_or(saturated)
}

pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    shift_months_saturating(date, i64::from(years) * 12, date.day())
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    clamped_date(date.year(), date.month(), 1)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    clamped_date(date.year(), date.month(), 31)
}

/// Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
