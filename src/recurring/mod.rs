//! Recurring debts and receivables and their virtual future occurrences.

pub mod model;
pub mod projector;

pub use model::{
    Obligation, ObligationKind, ObligationStatus, RecurrenceRule, Scheduled, ScheduledObligation,
    VirtualOccurrence,
};
pub use projector::{
    combine_with_virtual_occurrences, filter_by_financial_period, filter_occurrences_by_period,
    generate_virtual_occurrences, next_due_date, next_obligation, occurrences, Occurrences,
    ProjectionTotals, DEFAULT_MONTHS_AHEAD,
};
