use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::HorizonError;

/// Anything carrying a `YYYY-MM-DD` date string.
pub trait Dated {
    fn date(&self) -> &str;
}

/// Attribute accessors consulted by [`super::TransactionFilter`].
pub trait FilterableRecord: Dated {
    fn kind(&self) -> TransactionKind;
    fn amount(&self) -> f64;
    fn description(&self) -> &str;
    fn notes(&self) -> Option<&str>;
    fn tag_names(&self) -> Vec<&str>;
    fn category_id(&self) -> Option<Uuid>;
    fn account_id(&self) -> Option<Uuid>;
    fn card_id(&self) -> Option<Uuid>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = HorizonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(HorizonError::InvalidRef(format!("transaction type `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// Transaction row as delivered by the data store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub card_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl TransactionRecord {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            description: description.into(),
            amount,
            kind,
            notes: None,
            category_id: None,
            account_id: None,
            card_id: None,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(Tag {
            id: Uuid::new_v4(),
            name: name.into(),
        });
        self
    }
}

impl Dated for TransactionRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

impl FilterableRecord for TransactionRecord {
    fn kind(&self) -> TransactionKind {
        self.kind
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }

    fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    fn account_id(&self) -> Option<Uuid> {
        self.account_id
    }

    fn card_id(&self) -> Option<Uuid> {
        self.card_id
    }
}
