use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::gateway::GatewayError;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Outcome,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Outcome => write!(f, "outcome"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            other => Err(format!("Unknown transaction type: '{other}'")),
        }
    }
}

/// A row bound to its resolved category. `kind` and `value` are still the
/// text read from the source; the gateway decides whether they are storable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub kind: String,
    pub value: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub title: String,
    pub kind: TransactionType,
    pub value: Money,
    pub category: Category,
}

impl TryFrom<NewTransaction> for TransactionDraft {
    type Error = GatewayError;

    fn try_from(tx: NewTransaction) -> Result<Self, Self::Error> {
        let kind = tx
            .kind
            .parse::<TransactionType>()
            .map_err(|_| GatewayError::InvalidType(tx.kind.clone()))?;
        let value = tx
            .value
            .parse::<Money>()
            .map_err(|_| GatewayError::InvalidValue(tx.value.clone()))?;

        Ok(TransactionDraft {
            title: tx.title,
            kind,
            value,
            category: tx.category,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    pub kind: TransactionType,
    pub value: Money,
    pub category: Category,
    pub created_at: NaiveDateTime,
}
