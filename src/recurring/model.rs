use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::HorizonError;
use crate::time::Cadence;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObligationKind {
    /// Money the user owes.
    Debt,
    /// Money owed to the user.
    Receivable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObligationStatus {
    #[default]
    Pending,
    Paid,
    Received,
}

impl ObligationStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ObligationStatus::Pending)
    }
}

/// Limits attached to a recurring obligation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub cadence: Cadence,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_occurrences: Option<u32>,
    /// Position of the stored record inside its series (1-based).
    #[serde(default = "RecurrenceRule::default_current_count")]
    pub current_count: u32,
}

impl RecurrenceRule {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            end_date: None,
            max_occurrences: None,
            current_count: Self::default_current_count(),
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn limited_to(mut self, max_occurrences: u32) -> Self {
        self.max_occurrences = Some(max_occurrences);
        self
    }

    pub fn at_count(mut self, current_count: u32) -> Self {
        self.current_count = current_count;
        self
    }

    pub fn default_current_count() -> u32 {
        1
    }

    /// Whether occurrence `number` falling on `candidate` is inside every
    /// configured limit.
    pub fn allows(&self, number: u32, candidate: NaiveDate) -> bool {
        if self.end_date.is_some_and(|end| candidate > end) {
            return false;
        }
        if self.max_occurrences.is_some_and(|max| number > max) {
            return false;
        }
        true
    }
}

/// Debt or receivable as stored by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obligation {
    pub id: Uuid,
    pub kind: ObligationKind,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: ObligationStatus,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub card_id: Option<Uuid>,
    #[serde(default)]
    pub card_bill_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Obligation {
    pub fn new(
        kind: ObligationKind,
        description: impl Into<String>,
        amount: f64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            description: description.into(),
            amount,
            due_date,
            status: ObligationStatus::Pending,
            is_recurring: false,
            recurrence: None,
            account_id: None,
            category_id: None,
            card_id: None,
            card_bill_id: None,
            notes: None,
        }
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.is_recurring = true;
        self.recurrence = Some(rule);
        self
    }

    /// Rule that drives projection, if the record is flagged recurring.
    pub fn active_rule(&self) -> Option<&RecurrenceRule> {
        self.recurrence.as_ref().filter(|_| self.is_recurring)
    }

    /// Marks the stored record as paid or received depending on its kind.
    pub fn settle(&mut self) {
        self.status = match self.kind {
            ObligationKind::Debt => ObligationStatus::Paid,
            ObligationKind::Receivable => ObligationStatus::Received,
        };
    }
}

/// Computed future instance of a recurring obligation. Never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VirtualOccurrence {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub occurrence_number: u32,
    pub due_date: NaiveDate,
    pub kind: ObligationKind,
    pub description: String,
    pub amount: f64,
    pub status: ObligationStatus,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub card_bill_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl VirtualOccurrence {
    /// Stable identifier for occurrence `number` of `parent_id`.
    pub fn derive_id(parent_id: Uuid, number: u32) -> Uuid {
        Uuid::new_v5(&parent_id, format!("occurrence-{number}").as_bytes())
    }

    pub(crate) fn project(parent: &Obligation, number: u32, due_date: NaiveDate) -> Self {
        Self {
            id: Self::derive_id(parent.id, number),
            parent_id: parent.id,
            occurrence_number: number,
            due_date,
            kind: parent.kind,
            description: parent.description.clone(),
            amount: parent.amount,
            status: ObligationStatus::Pending,
            account_id: parent.account_id,
            category_id: parent.category_id,
            card_id: parent.card_id,
            card_bill_id: parent.card_bill_id,
            notes: parent.notes.clone(),
        }
    }
}

/// Anything scheduled on a due date.
pub trait Scheduled {
    fn due_date(&self) -> NaiveDate;
}

impl Scheduled for Obligation {
    fn due_date(&self) -> NaiveDate {
        self.due_date
    }
}

impl Scheduled for VirtualOccurrence {
    fn due_date(&self) -> NaiveDate {
        self.due_date
    }
}

/// Entry of a forward-looking schedule: either the stored record or one of
/// its projections. Only stored entries can be mutated.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ScheduledObligation {
    Stored(Obligation),
    Virtual(VirtualOccurrence),
}

impl ScheduledObligation {
    pub fn id(&self) -> Uuid {
        match self {
            ScheduledObligation::Stored(obligation) => obligation.id,
            ScheduledObligation::Virtual(occurrence) => occurrence.id,
        }
    }

    pub fn kind(&self) -> ObligationKind {
        match self {
            ScheduledObligation::Stored(obligation) => obligation.kind,
            ScheduledObligation::Virtual(occurrence) => occurrence.kind,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            ScheduledObligation::Stored(obligation) => obligation.amount,
            ScheduledObligation::Virtual(occurrence) => occurrence.amount,
        }
    }

    pub fn status(&self) -> ObligationStatus {
        match self {
            ScheduledObligation::Stored(obligation) => obligation.status,
            ScheduledObligation::Virtual(occurrence) => occurrence.status,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, ScheduledObligation::Virtual(_))
    }

    /// Mutable access to the persisted record; virtual entries refuse.
    pub fn stored_mut(&mut self) -> Result<&mut Obligation, HorizonError> {
        match self {
            ScheduledObligation::Stored(obligation) => Ok(obligation),
            ScheduledObligation::Virtual(occurrence) => {
                Err(HorizonError::VirtualOccurrence(occurrence.id))
            }
        }
    }

    pub fn settle(&mut self) -> Result<(), HorizonError> {
        self.stored_mut()?.settle();
        Ok(())
    }
}

impl Scheduled for ScheduledObligation {
    fn due_date(&self) -> NaiveDate {
        match self {
            ScheduledObligation::Stored(obligation) => obligation.due_date,
            ScheduledObligation::Virtual(occurrence) => occurrence.due_date,
        }
    }
}
