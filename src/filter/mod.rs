//! Relative date-range selection and attribute filtering of transactions.

pub mod record;

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::HorizonError;
use crate::time::{
    calendar::clamped_date, end_of_day, first_of_month, last_of_month, parse_ymd, shift_month,
    start_of_day, start_of_week,
};

pub use record::{Dated, FilterableRecord, Tag, TransactionKind, TransactionRecord};

/// Relative window selectors offered by the transaction list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DateRangeSelector {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "this-week")]
    ThisWeek,
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[serde(rename = "current-month")]
    CurrentMonth,
    #[serde(rename = "last-month")]
    LastMonth,
    #[serde(rename = "current-year")]
    CurrentYear,
    #[serde(rename = "last-30-days")]
    Last30Days,
    #[default]
    #[serde(rename = "all")]
    All,
}

/// Concrete boundaries of a selector. `to` is inclusive when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub from: NaiveDateTime,
    pub to: Option<NaiveDateTime>,
}

impl DateBounds {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.from && self.to.map_or(true, |to| instant <= to)
    }
}

impl DateRangeSelector {
    pub const ALL: [DateRangeSelector; 8] = [
        DateRangeSelector::Today,
        DateRangeSelector::ThisWeek,
        DateRangeSelector::Last7Days,
        DateRangeSelector::CurrentMonth,
        DateRangeSelector::LastMonth,
        DateRangeSelector::CurrentYear,
        DateRangeSelector::Last30Days,
        DateRangeSelector::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangeSelector::Today => "today",
            DateRangeSelector::ThisWeek => "this-week",
            DateRangeSelector::Last7Days => "last-7-days",
            DateRangeSelector::CurrentMonth => "current-month",
            DateRangeSelector::LastMonth => "last-month",
            DateRangeSelector::CurrentYear => "current-year",
            DateRangeSelector::Last30Days => "last-30-days",
            DateRangeSelector::All => "all",
        }
    }

    /// Boundaries relative to `now`; `None` for [`DateRangeSelector::All`].
    pub fn bounds(&self, now: NaiveDateTime) -> Option<DateBounds> {
        let today = now.date();
        let from = |date| DateBounds {
            from: start_of_day(date),
            to: None,
        };
        match self {
            DateRangeSelector::Today => Some(from(today)),
            DateRangeSelector::ThisWeek => Some(from(start_of_week(today))),
            DateRangeSelector::Last7Days => Some(from(today - Duration::days(7))),
            DateRangeSelector::Last30Days => Some(from(today - Duration::days(30))),
            DateRangeSelector::CurrentMonth => Some(from(first_of_month(today))),
            DateRangeSelector::LastMonth => {
                let previous = shift_month(first_of_month(today), -1);
                Some(DateBounds {
                    from: start_of_day(previous),
                    to: Some(end_of_day(last_of_month(previous))),
                })
            }
            DateRangeSelector::CurrentYear => Some(from(clamped_date(today.year(), 1, 1))),
            DateRangeSelector::All => None,
        }
    }
}

impl fmt::Display for DateRangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRangeSelector {
    type Err = HorizonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DateRangeSelector::ALL
            .into_iter()
            .find(|selector| selector.as_str() == value.trim())
            .ok_or_else(|| HorizonError::UnknownDateRange(value.to_string()))
    }
}

/// Keeps the records dated inside `selector`'s window and orders them newest
/// first by their raw date string.
///
/// Dates are parsed from calendar fields; a malformed date fails the whole
/// call with [`HorizonError::InvalidDate`]. `All` performs no parsing.
pub fn apply_date_range_filter<T>(
    records: &[T],
    selector: DateRangeSelector,
    now: NaiveDateTime,
) -> Result<Vec<T>, HorizonError>
where
    T: Dated + Clone,
{
    let mut kept = match selector.bounds(now) {
        None => records.to_vec(),
        Some(bounds) => {
            let mut kept = Vec::new();
            for record in records {
                let date = parse_ymd(record.date())?;
                if bounds.contains(start_of_day(date)) {
                    kept.push(record.clone());
                }
            }
            kept
        }
    };
    sort_newest_first(&mut kept);
    Ok(kept)
}

/// Stable descending sort on the raw `YYYY-MM-DD` string.
pub fn sort_newest_first<T: Dated>(records: &mut [T]) {
    records.sort_by(|a, b| b.date().cmp(a.date()));
}

/// Maps the `"all"`/empty sentinel used by list controls to "no filter".
pub fn selection(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_id(field: &str, raw: &str) -> Result<Option<Uuid>, HorizonError> {
    selection(raw)
        .map(|value| {
            Uuid::parse_str(value)
                .map_err(|_| HorizonError::InvalidRef(format!("{field} `{value}`")))
        })
        .transpose()
}

/// Combined list filter. Every `None` field is inactive; active fields are
/// AND-ed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub search: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub date_range: DateRangeSelector,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, raw: &str) -> Result<Self, HorizonError> {
        self.kind = selection(raw)
            .map(str::parse::<TransactionKind>)
            .transpose()?;
        Ok(self)
    }

    pub fn with_category(mut self, raw: &str) -> Result<Self, HorizonError> {
        self.category_id = parse_id("category", raw)?;
        Ok(self)
    }

    pub fn with_account(mut self, raw: &str) -> Result<Self, HorizonError> {
        self.account_id = parse_id("account", raw)?;
        Ok(self)
    }

    pub fn with_card(mut self, raw: &str) -> Result<Self, HorizonError> {
        self.card_id = parse_id("card", raw)?;
        Ok(self)
    }

    pub fn with_search(mut self, raw: &str) -> Self {
        let trimmed = raw.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    pub fn with_amount_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn with_date_range(mut self, selector: DateRangeSelector) -> Self {
        self.date_range = selector;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == TransactionFilter::default()
    }

    /// Evaluates every attribute predicate except the date range.
    pub fn matches<T: FilterableRecord>(&self, record: &T) -> bool {
        if self.kind.is_some_and(|kind| record.kind() != kind) {
            return false;
        }
        if self.category_id.is_some() && record.category_id() != self.category_id {
            return false;
        }
        if self.account_id.is_some() && record.account_id() != self.account_id {
            return false;
        }
        if self.card_id.is_some() && record.card_id() != self.card_id {
            return false;
        }
        if self.min_amount.is_some_and(|min| record.amount() < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| record.amount() > max) {
            return false;
        }
        match &self.search {
            Some(needle) => matches_text(record, needle),
            None => true,
        }
    }
}

fn matches_text<T: FilterableRecord>(record: &T, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);
    hit(record.description())
        || record.notes().is_some_and(hit)
        || record.tag_names().into_iter().any(hit)
}

/// Applies attribute predicates, then the date window, newest first.
pub fn apply_filters<T>(
    records: &[T],
    filter: &TransactionFilter,
    now: NaiveDateTime,
) -> Result<Vec<T>, HorizonError>
where
    T: FilterableRecord + Clone,
{
    let matching: Vec<T> = records
        .iter()
        .filter(|record| filter.matches(*record))
        .cloned()
        .collect();
    let result = apply_date_range_filter(&matching, filter.date_range, now)?;
    tracing::debug!(
        input = records.len(),
        output = result.len(),
        range = %filter.date_range,
        "applied transaction filters"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        // Wednesday.
        NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn dates(records: &[TransactionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.date.as_str()).collect()
    }

    fn sample() -> Vec<TransactionRecord> {
        [
            "2024-03-13",
            "2024-02-29",
            "2024-03-10",
            "2024-03-06",
            "2024-02-01",
            "2024-01-01",
            "2023-12-31",
            "2024-03-09",
        ]
        .into_iter()
        .map(|d| TransactionRecord::new(d, "entry", 10.0, TransactionKind::Expense))
        .collect()
    }

    #[test]
    fn selector_windows() {
        let records = sample();
        let run = |selector| apply_date_range_filter(&records, selector, now()).unwrap();

        assert_eq!(dates(&run(DateRangeSelector::Today)), vec!["2024-03-13"]);
        assert_eq!(
            dates(&run(DateRangeSelector::ThisWeek)),
            vec!["2024-03-13", "2024-03-10"]
        );
        assert_eq!(
            dates(&run(DateRangeSelector::Last7Days)),
            vec!["2024-03-13", "2024-03-10", "2024-03-09", "2024-03-06"]
        );
        assert_eq!(
            dates(&run(DateRangeSelector::LastMonth)),
            vec!["2024-02-29", "2024-02-01"]
        );
        assert_eq!(run(DateRangeSelector::CurrentYear).len(), 7);
        assert_eq!(run(DateRangeSelector::All).len(), records.len());
    }

    #[test]
    fn last_month_bounds_are_inclusive() {
        let bounds = DateRangeSelector::LastMonth.bounds(now()).unwrap();
        assert_eq!(bounds.from.to_string(), "2024-02-01 00:00:00");
        assert_eq!(bounds.to.unwrap().to_string(), "2024-02-29 23:59:59.999");
        assert!(DateRangeSelector::All.bounds(now()).is_none());
    }

    #[test]
    fn malformed_dates_fail_loudly() {
        let records = vec![TransactionRecord::new(
            "13/03/2024",
            "bad",
            1.0,
            TransactionKind::Income,
        )];
        let err = apply_date_range_filter(&records, DateRangeSelector::Today, now()).unwrap_err();
        assert!(matches!(err, HorizonError::InvalidDate(_)));
    }

    #[test]
    fn selector_tags_round_trip() {
        for selector in DateRangeSelector::ALL {
            assert_eq!(selector.as_str().parse::<DateRangeSelector>().unwrap(), selector);
            let json = serde_json::to_string(&selector).unwrap();
            assert_eq!(json, format!("\"{}\"", selector.as_str()));
        }
        assert!("yesterday".parse::<DateRangeSelector>().is_err());
    }

    #[test]
    fn sentinel_values_disable_filters() {
        let filter = TransactionFilter::new()
            .with_kind("all")
            .unwrap()
            .with_category("")
            .unwrap()
            .with_account(" ALL ")
            .unwrap()
            .with_search("   ");
        assert!(filter.is_empty());
        assert!(TransactionFilter::new().with_card("not-a-uuid").is_err());
    }
}
