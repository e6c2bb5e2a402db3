#![allow(dead_code)]

use budget_horizon::filter::{TransactionKind, TransactionRecord};
use budget_horizon::recurring::{Obligation, ObligationKind, RecurrenceRule};
use budget_horizon::time::Cadence;
use chrono::{NaiveDate, NaiveDateTime};

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).expect("valid time")
}

/// Every day from `start` to `end`, both included.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

pub fn expense(date: &str, description: &str, amount: f64) -> TransactionRecord {
    TransactionRecord::new(date, description, amount, TransactionKind::Expense)
}

pub fn income(date: &str, description: &str, amount: f64) -> TransactionRecord {
    TransactionRecord::new(date, description, amount, TransactionKind::Income)
}

pub fn recurring_debt(description: &str, due: NaiveDate, rule: RecurrenceRule) -> Obligation {
    Obligation::new(ObligationKind::Debt, description, 100.0, due).with_recurrence(rule)
}

pub fn monthly(description: &str, due: NaiveDate) -> Obligation {
    recurring_debt(description, due, RecurrenceRule::new(Cadence::Monthly))
}
