//! Financial periods: month-like windows whose boundary falls on a
//! user-configured day instead of the 1st.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::HorizonError;
use crate::time::{calendar::clamped_date, end_of_day, shift_month_with_day, start_of_day};

/// Day of the month on which a financial period begins (1..=31).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MonthStartDay(u32);

impl MonthStartDay {
    pub const FIRST: MonthStartDay = MonthStartDay(1);

    pub fn new(day: u32) -> Result<Self, HorizonError> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(HorizonError::InvalidMonthStartDay(day))
        }
    }

    /// Resolves an optional stored preference, defaulting to the 1st.
    pub fn or_default(day: Option<u32>) -> Result<Self, HorizonError> {
        day.map_or(Ok(Self::FIRST), Self::new)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Boundary date inside `year`/`month`; short months use their last day.
    fn in_month(self, year: i32, month: u32) -> NaiveDate {
        clamped_date(year, month, self.0)
    }
}

impl Default for MonthStartDay {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for MonthStartDay {
    type Error = HorizonError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthStartDay> for u32 {
    fn from(value: MonthStartDay) -> Self {
        value.0
    }
}

/// Closed window from local midnight of the first day to 23:59:59.999 of the
/// last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FinancialPeriod {
    /// Builds a period covering the whole calendar days `first..=last`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end_date() - self.start_date()).num_days() + 1
    }

    /// Financial period immediately following this one.
    pub fn next(&self, day: MonthStartDay) -> Self {
        financial_period(day, self.end_date() + chrono::Duration::days(1))
    }

    /// Financial period immediately preceding this one.
    pub fn previous(&self, day: MonthStartDay) -> Self {
        financial_period(day, self.start_date() - chrono::Duration::days(1))
    }
}

impl fmt::Display for FinancialPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start_date(), self.end_date())
    }
}

/// Returns the financial period containing `reference`.
pub fn financial_period(day: MonthStartDay, reference: NaiveDate) -> FinancialPeriod {
    let boundary = day.in_month(reference.year(), reference.month());
    let start = if reference >= boundary {
        boundary
    } else {
        shift_month_with_day(boundary, -1, day.get())
    };
    let next_start = shift_month_with_day(start, 1, day.get());
    let last = next_start.pred_opt().unwrap_or(next_start);
    FinancialPeriod::from_dates(start, last)
}

/// Enumerated reporting windows built on top of the financial period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PeriodType {
    #[default]
    #[serde(rename = "current-month")]
    CurrentMonth,
    #[serde(rename = "last-3-months")]
    LastThreeMonths,
    #[serde(rename = "last-6-months")]
    LastSixMonths,
    #[serde(rename = "current-year")]
    CurrentYear,
}

impl PeriodType {
    pub const ALL: [PeriodType; 4] = [
        PeriodType::CurrentMonth,
        PeriodType::LastThreeMonths,
        PeriodType::LastSixMonths,
        PeriodType::CurrentYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::CurrentMonth => "current-month",
            PeriodType::LastThreeMonths => "last-3-months",
            PeriodType::LastSixMonths => "last-6-months",
            PeriodType::CurrentYear => "current-year",
        }
    }

    /// Whole months prepended to the current financial period.
    fn extra_months(&self) -> Option<i32> {
        match self {
            PeriodType::CurrentMonth => Some(0),
            PeriodType::LastThreeMonths => Some(2),
            PeriodType::LastSixMonths => Some(5),
            PeriodType::CurrentYear => None,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = HorizonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PeriodType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| HorizonError::UnknownPeriodType(value.to_string()))
    }
}

/// Resolves a reporting window of the given type around `reference`.
pub fn financial_period_by_type(
    kind: PeriodType,
    day: MonthStartDay,
    reference: NaiveDate,
) -> FinancialPeriod {
    match kind.extra_months() {
        Some(months) => {
            let current = financial_period(day, reference);
            let start = shift_month_with_day(current.start_date(), -months, day.get());
            FinancialPeriod {
                start: start_of_day(start),
                end: current.end,
            }
        }
        None => FinancialPeriod::from_dates(
            clamped_date(reference.year(), 1, 1),
            clamped_date(reference.year(), 12, 31),
        ),
    }
}

/// Tag-based lookup used by callers holding an untyped selector.
///
/// Unrecognized tags resolve to the current financial period. The fallback is
/// logged; use [`PeriodType::from_str`] to reject them instead.
pub fn financial_period_by_tag(
    tag: &str,
    day: MonthStartDay,
    reference: NaiveDate,
) -> FinancialPeriod {
    let kind = tag.parse::<PeriodType>().unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to current-month period");
        PeriodType::CurrentMonth
    });
    financial_period_by_type(kind, day, reference)
}
