#![doc(test(attr(deny(warnings))))]

//! Budget Horizon owns the date logic behind a personal-finance ledger:
//! financial periods anchored on a configurable month-start day, relative
//! date-range filtering of transactions, and projection of recurring debts
//! and receivables into virtual future occurrences.

pub mod cache;
pub mod config;
pub mod errors;
pub mod filter;
pub mod period;
pub mod planner;
pub mod recurring;
pub mod time;
pub mod utils;

pub use planner::Planner;
pub use errors::{HorizonError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Horizon tracing initialized.");
    });
}
