use thiserror::Error;
use uuid::Uuid;

/// Error type shared by period, filter, and projection helpers.
#[derive(Debug, Error)]
pub enum HorizonError {
    #[error("Invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid month start day {0}: expected a value between 1 and 31")]
    InvalidMonthStartDay(u32),
    #[error("Unknown period type: {0}")]
    UnknownPeriodType(String),
    #[error("Unknown date range: {0}")]
    UnknownDateRange(String),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Virtual occurrence {0} cannot be modified")]
    VirtualOccurrence(Uuid),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T, E = HorizonError> = std::result::Result<T, E>;
