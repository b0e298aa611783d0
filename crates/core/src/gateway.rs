//! The storage boundary the import pipeline talks to.
//!
//! Implementations own identity assignment and the catalog's uniqueness
//! rule; callers never construct a [`Category`] or [`Transaction`] directly.

use async_trait::async_trait;
use thiserror::Error;

use crate::category::{Category, CategoryDraft, CategoryId};
use crate::transaction::{NewTransaction, Transaction, TransactionDraft};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Category already exists: '{title}'")]
    Conflict { title: String },
    #[error("Invalid transaction type: '{0}'")]
    InvalidType(String),
    #[error("Invalid transaction value: '{0}'")]
    InvalidValue(String),
    #[error("Category not found: {0}")]
    DanglingCategory(CategoryId),
    #[error("Storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// One batched lookup for every category whose title is in `titles`.
    async fn find_categories_by_title(
        &self,
        titles: &[String],
    ) -> Result<Vec<Category>, GatewayError>;

    fn create_categories(&self, titles: &[String]) -> Vec<CategoryDraft> {
        titles.iter().map(|t| CategoryDraft::new(t)).collect()
    }

    /// Stores every draft or none of them. A title already present in the
    /// catalog fails with [`GatewayError::Conflict`].
    async fn save_categories(
        &self,
        drafts: Vec<CategoryDraft>,
    ) -> Result<Vec<Category>, GatewayError>;

    fn create_transactions(
        &self,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<TransactionDraft>, GatewayError> {
        transactions
            .into_iter()
            .map(TransactionDraft::try_from)
            .collect()
    }

    /// Stores every draft or none of them. Each draft's category must exist
    /// in the catalog when the write commits.
    async fn save_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, GatewayError>;
}
