use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::{Transaction, TransactionType};

/// Totals over a set of transactions. `total` is income minus outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub income: Money,
    pub outcome: Money,
    pub total: Money,
}

impl Balance {
    pub fn new(income: Money, outcome: Money) -> Self {
        Balance {
            income,
            outcome,
            total: income - outcome,
        }
    }

    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (income, outcome) = transactions.iter().fold(
            (Money::zero(), Money::zero()),
            |(income, outcome), tx| match tx.kind {
                TransactionType::Income => (income + tx.value, outcome),
                TransactionType::Outcome => (income, outcome + tx.value),
            },
        );
        Balance::new(income, outcome)
    }
}

impl Default for Balance {
    fn default() -> Self {
        Balance::new(Money::zero(), Money::zero())
    }
}
