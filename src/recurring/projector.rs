use chrono::{Months, NaiveDate};
use uuid::Uuid;

use super::model::{
    Obligation, ObligationKind, ObligationStatus, RecurrenceRule, Scheduled, ScheduledObligation,
    VirtualOccurrence,
};
use crate::period::FinancialPeriod;

/// Projection horizon used when the caller has no preference.
pub const DEFAULT_MONTHS_AHEAD: u32 = 6;
/// Upper bound on cadence steps walked for a single obligation.
pub const MAX_PROJECTED_STEPS: u32 = 100_000;

/// Finite sequence of virtual occurrences for one obligation.
///
/// Clone before consuming to replay the sequence from the start.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    parent: &'a Obligation,
    rule: Option<&'a RecurrenceRule>,
    horizon: NaiveDate,
    budget: u32,
    step: u32,
    next_number: u32,
    previous: NaiveDate,
    finished: bool,
}

impl<'a> Occurrences<'a> {
    fn new(parent: &'a Obligation, horizon: NaiveDate) -> Self {
        let rule = parent.active_rule();
        let budget = rule.map_or(0, |r| {
            r.cadence
                .steps_until(parent.due_date, horizon)
                .saturating_add(1)
                .min(MAX_PROJECTED_STEPS)
        });
        Self {
            parent,
            rule,
            horizon,
            budget,
            step: 0,
            next_number: rule.map_or(1, |r| r.current_count.saturating_add(1)),
            previous: parent.due_date,
            finished: rule.is_none(),
        }
    }

    /// Last date an occurrence may fall on.
    pub fn horizon(&self) -> NaiveDate {
        self.horizon
    }

    fn stop(&mut self) -> Option<VirtualOccurrence> {
        self.finished = true;
        None
    }
}

impl Iterator for Occurrences<'_> {
    type Item = VirtualOccurrence;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let rule = self.rule?;
        if self.step >= self.budget {
            if self.budget == MAX_PROJECTED_STEPS {
                tracing::warn!(
                    obligation = %self.parent.id,
                    steps = self.step,
                    "projection guard reached"
                );
            }
            return self.stop();
        }
        self.step += 1;
        let candidate = rule.cadence.advance(self.parent.due_date, self.step);
        if !rule.allows(self.next_number, candidate) || candidate > self.horizon {
            return self.stop();
        }
        // Never repeats the stored due date nor a date pinned at the calendar's end.
        if candidate <= self.previous {
            return self.stop();
        }
        self.previous = candidate;
        let occurrence = VirtualOccurrence::project(self.parent, self.next_number, candidate);
        self.next_number = self.next_number.saturating_add(1);
        Some(occurrence)
    }
}

/// Lazily walks the future occurrences of `obligation` up to
/// `today + months_ahead` months. A horizon past the end of the calendar is
/// pinned to [`NaiveDate::MAX`].
pub fn occurrences(
    obligation: &Obligation,
    months_ahead: u32,
    today: NaiveDate,
) -> Occurrences<'_> {
    let horizon = today
        .checked_add_months(Months::new(months_ahead))
        .unwrap_or(NaiveDate::MAX);
    Occurrences::new(obligation, horizon)
}

/// Materializes every virtual occurrence of `obligation` inside the horizon.
///
/// Returns an empty list for non-recurring obligations. The stored due date
/// itself is never repeated.
pub fn generate_virtual_occurrences(
    obligation: &Obligation,
    months_ahead: u32,
    today: NaiveDate,
) -> Vec<VirtualOccurrence> {
    let generated: Vec<_> = occurrences(obligation, months_ahead, today).collect();
    tracing::trace!(
        obligation = %obligation.id,
        generated = generated.len(),
        "projected recurring obligation"
    );
    generated
}

/// Interleaves each stored obligation with its projections, keeping input
/// order.
pub fn combine_with_virtual_occurrences(
    obligations: &[Obligation],
    months_ahead: u32,
    today: NaiveDate,
) -> Vec<ScheduledObligation> {
    let mut combined = Vec::with_capacity(obligations.len());
    for obligation in obligations {
        combined.push(ScheduledObligation::Stored(obligation.clone()));
        combined.extend(
            occurrences(obligation, months_ahead, today).map(ScheduledObligation::Virtual),
        );
    }
    combined
}

/// Keeps items due within `start..=end`.
pub fn filter_occurrences_by_period<T>(items: &[T], start: NaiveDate, end: NaiveDate) -> Vec<T>
where
    T: Scheduled + Clone,
{
    items
        .iter()
        .filter(|item| {
            let due = item.due_date();
            due >= start && due <= end
        })
        .cloned()
        .collect()
}

pub fn filter_by_financial_period<T>(items: &[T], period: &FinancialPeriod) -> Vec<T>
where
    T: Scheduled + Clone,
{
    filter_occurrences_by_period(items, period.start_date(), period.end_date())
}

/// Due date the next stored record of the series would take, if the rule
/// still allows one.
pub fn next_due_date(obligation: &Obligation) -> Option<NaiveDate> {
    let rule = obligation.active_rule()?;
    let candidate = rule.cadence.next_date(obligation.due_date);
    rule.allows(rule.current_count.saturating_add(1), candidate)
        .then_some(candidate)
}

/// Builds the next stored record of a recurring series, typically once the
/// current one has been settled.
pub fn next_obligation(obligation: &Obligation) -> Option<Obligation> {
    let due_date = next_due_date(obligation)?;
    let mut next = obligation.clone();
    next.id = Uuid::new_v4();
    next.due_date = due_date;
    next.status = ObligationStatus::Pending;
    if let Some(rule) = next.recurrence.as_mut() {
        rule.current_count = rule.current_count.saturating_add(1);
    }
    Some(next)
}

/// Outstanding amounts of a schedule. Settled entries are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionTotals {
    pub entries: usize,
    pub virtual_entries: usize,
    pub payable: f64,
    pub receivable: f64,
    pub net: f64,
}

impl ProjectionTotals {
    pub fn from_entries(entries: &[ScheduledObligation]) -> Self {
        let mut totals = ProjectionTotals::default();
        for entry in entries.iter().filter(|e| !e.status().is_settled()) {
            totals.entries += 1;
            if entry.is_virtual() {
                totals.virtual_entries += 1;
            }
            match entry.kind() {
                ObligationKind::Debt => totals.payable += entry.amount(),
                ObligationKind::Receivable => totals.receivable += entry.amount(),
            }
        }
        totals.net = totals.receivable - totals.payable;
        totals
    }
}
