//! Calendar arithmetic, recurrence cadences, and the clock abstraction.

pub mod cadence;
pub mod calendar;
pub mod clock;

pub use cadence::Cadence;
pub use calendar::{
    days_in_month, end_of_day, first_of_month, last_of_month, parse_ymd, shift_month,
    shift_month_with_day, shift_months_saturating, shift_year, start_of_day, start_of_week,
};
pub use clock::{Clock, FixedClock, SystemClock};
