//! Transaction records as stored by the backend.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::common::{Amounted, Displayable};
use crate::date::{format_date_for_input, iso_date};

/// Opaque backend-assigned identifier.
///
/// The backend may encode ids as JSON numbers or strings; both decode to the
/// same textual form, which is what goes into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for TransactionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Unsigned(value) => Self(value.to_string()),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        })
    }
}

/// Direction of a transaction. Serialized with the backend's spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransactionKind {
    #[default]
    #[serde(rename = "REVENUE")]
    Revenue,
    #[serde(rename = "DEPENSE", alias = "EXPENSE")]
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Revenue, TransactionKind::Expense];

    /// Multiplier applied to an amount when it is folded into the balance.
    pub fn sign(self) -> f64 {
        match self {
            TransactionKind::Revenue => 1.0,
            TransactionKind::Expense => -1.0,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            TransactionKind::Revenue => "REVENUE",
            TransactionKind::Expense => "DEPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction type `{0}` (expected revenue or depense)")]
pub struct ParseKindError(pub String);

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "revenue" | "income" | "r" => Ok(TransactionKind::Revenue),
            "depense" | "dépense" | "expense" | "d" | "e" => Ok(TransactionKind::Expense),
            _ => Err(ParseKindError(value.to_string())),
        }
    }
}

/// A transaction as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
}

impl Amounted for Transaction {
    fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "#{} {} [{}] {} on {}",
            self.id,
            self.description,
            self.kind,
            self.amount,
            format_date_for_input(self.date)
        )
    }
}

/// Request body for create and update calls. Carries no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            description: self.description,
            kind: self.kind,
            amount: self.amount,
            date: self.date,
        }
    }
}
