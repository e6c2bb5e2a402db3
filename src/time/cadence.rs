use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::shift_months_saturating;

/// Step unit of a recurring obligation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    /// Date of the `steps`-th occurrence counted from `anchor`.
    ///
    /// Month and year steps are measured from the anchor itself rather than
    /// from the previous occurrence, so a series anchored on the 31st returns
    /// to the 31st after passing through a shorter month. Results past the end
    /// of the calendar saturate to [`NaiveDate::MAX`].
    pub fn advance(&self, anchor: NaiveDate, steps: u32) -> NaiveDate {
        let steps = i64::from(steps);
        match self {
            Cadence::Weekly => Duration::try_weeks(steps)
                .and_then(|span| anchor.checked_add_signed(span))
                .unwrap_or(NaiveDate::MAX),
            Cadence::Monthly => shift_months_saturating(anchor, steps, anchor.day()),
            Cadence::Yearly => shift_months_saturating(anchor, steps * 12, anchor.day()),
        }
    }

    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        self.advance(from, 1)
    }

    /// Upper bound on the steps from `anchor` that can land on or before
    /// `until`. Zero when `until` precedes the anchor.
    pub fn steps_until(&self, anchor: NaiveDate, until: NaiveDate) -> u32 {
        if until <= anchor {
            return 0;
        }
        let months = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month0());
        let steps = match self {
            Cadence::Weekly => (until - anchor).num_days() / 7,
            Cadence::Monthly => months(until) - months(anchor),
            Cadence::Yearly => i64::from(until.year() - anchor.year()),
        };
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
            Cadence::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Cadence::Weekly),
            "monthly" => Ok(Cadence::Monthly),
            "yearly" => Ok(Cadence::Yearly),
            other => Err(format!("unknown cadence `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_date_per_cadence() {
        let start = ymd(2025, 1, 1);
        assert_eq!(Cadence::Weekly.next_date(start), ymd(2025, 1, 8));
        assert_eq!(Cadence::Monthly.next_date(start), ymd(2025, 2, 1));
        assert_eq!(Cadence::Yearly.next_date(start), ymd(2026, 1, 1));
    }

    #[test]
    fn monthly_series_does_not_drift_after_february() {
        let anchor = ymd(2024, 1, 31);
        let dates: Vec<_> = (1..=3).map(|n| Cadence::Monthly.advance(anchor, n)).collect();
        assert_eq!(dates, vec![ymd(2024, 2, 29), ymd(2024, 3, 31), ymd(2024, 4, 30)]);
    }

    #[test]
    fn yearly_leap_day_clamps() {
        assert_eq!(Cadence::Yearly.advance(ymd(2024, 2, 29), 1), ymd(2025, 2, 28));
        assert_eq!(Cadence::Yearly.advance(ymd(2024, 2, 29), 4), ymd(2028, 2, 29));
    }

    #[test]
    fn advance_saturates_past_calendar_end() {
        let anchor = ymd(2024, 1, 15);
        assert_eq!(Cadence::Weekly.advance(anchor, u32::MAX), NaiveDate::MAX);
        assert_eq!(Cadence::Monthly.advance(anchor, u32::MAX), NaiveDate::MAX);
        assert_eq!(Cadence::Yearly.advance(anchor, u32::MAX), NaiveDate::MAX);
    }

    #[test]
    fn steps_until_bounds_reachable_occurrences() {
        let anchor = ymd(2000, 1, 3);
        let until = ymd(2024, 12, 1);
        for cadence in [Cadence::Weekly, Cadence::Monthly, Cadence::Yearly] {
            let steps = cadence.steps_until(anchor, until);
            assert!(cadence.advance(anchor, steps + 1) > until, "{cadence}");
        }
        assert_eq!(Cadence::Monthly.steps_until(anchor, until), 299);
        assert_eq!(Cadence::Yearly.steps_until(until, anchor), 0);
    }

    #[test]
    fn parses_tags() {
        assert_eq!("Monthly".parse::<Cadence>().unwrap(), Cadence::Monthly);
        assert!("daily".parse::<Cadence>().is_err());
        assert_eq!(Cadence::Weekly.to_string(), "weekly");
    }
}
