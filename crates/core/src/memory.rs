//! A process-local [`LedgerGateway`] with the same uniqueness and
//! all-or-nothing rules as the SQLite one.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::category::{Category, CategoryDraft, CategoryId};
use crate::gateway::{GatewayError, LedgerGateway};
use crate::transaction::{Transaction, TransactionDraft, TransactionId};

#[derive(Debug, Default)]
struct Catalog {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    last_category_id: i64,
    last_transaction_id: i64,
}

impl Catalog {
    fn insert_category(&mut self, title: String) -> Category {
        self.last_category_id += 1;
        let category = Category {
            id: CategoryId(self.last_category_id),
            title,
            created_at: Utc::now().naive_utc(),
        };
        self.categories.push(category.clone());
        category
    }
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    catalog: Mutex<Catalog>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose catalog already holds `titles`, with ids assigned in order.
    pub fn with_categories(titles: &[&str]) -> Self {
        let gateway = Self::new();
        {
            let mut catalog = gateway.lock();
            for title in titles {
                catalog.insert_category(title.to_string());
            }
        }
        gateway
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LedgerGateway for MemoryGateway {
    async fn find_categories_by_title(
        &self,
        titles: &[String],
    ) -> Result<Vec<Category>, GatewayError> {
        let wanted: HashSet<&str> = titles.iter().map(String::as_str).collect();
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| wanted.contains(c.title.as_str()))
            .cloned()
            .collect())
    }

    async fn save_categories(
        &self,
        drafts: Vec<CategoryDraft>,
    ) -> Result<Vec<Category>, GatewayError> {
        let mut catalog = self.lock();

        let mut taken: HashSet<String> =
            catalog.categories.iter().map(|c| c.title.clone()).collect();
        for draft in &drafts {
            if !taken.insert(draft.title.clone()) {
                return Err(GatewayError::Conflict {
                    title: draft.title.clone(),
                });
            }
        }

        Ok(drafts
            .into_iter()
            .map(|draft| catalog.insert_category(draft.title))
            .collect())
    }

    async fn save_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let mut catalog = self.lock();

        let known: HashSet<CategoryId> = catalog.categories.iter().map(|c| c.id).collect();
        if let Some(dangling) = drafts.iter().find(|d| !known.contains(&d.category.id)) {
            return Err(GatewayError::DanglingCategory(dangling.category.id));
        }

        let mut saved = Vec::with_capacity(drafts.len());
        for draft in drafts {
            catalog.last_transaction_id += 1;
            let tx = Transaction {
                id: TransactionId(catalog.last_transaction_id),
                title: draft.title,
                kind: draft.kind,
                value: draft.value,
                category: draft.category,
                created_at: Utc::now().naive_utc(),
            };
            catalog.transactions.push(tx.clone());
            saved.push(tx);
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::transaction::TransactionType;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn find_returns_only_requested_titles() {
        let gateway = MemoryGateway::with_categories(&["Food", "Travel", "Rent"]);
        let found = gateway
            .find_categories_by_title(&titles(&["Food", "Rent", "Gym"]))
            .await
            .unwrap();
        let mut found: Vec<_> = found.into_iter().map(|c| c.title).collect();
        found.sort();
        assert_eq!(found, vec!["Food", "Rent"]);
    }

    #[tokio::test]
    async fn find_is_case_sensitive() {
        let gateway = MemoryGateway::with_categories(&["Food"]);
        let found = gateway
            .find_categories_by_title(&titles(&["food"]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn save_categories_assigns_fresh_ids() {
        let gateway = MemoryGateway::with_categories(&["Food"]);
        let drafts = gateway.create_categories(&titles(&["Travel", "Gym"]));
        let saved = gateway.save_categories(drafts).await.unwrap();
        assert_eq!(saved[0].id, CategoryId(2));
        assert_eq!(saved[1].id, CategoryId(3));
        assert_eq!(gateway.categories().len(), 3);
    }

    #[tokio::test]
    async fn save_categories_conflict_stores_nothing() {
        let gateway = MemoryGateway::with_categories(&["Food"]);
        let drafts = gateway.create_categories(&titles(&["Travel", "Food"]));
        let result = gateway.save_categories(drafts).await;
        assert!(matches!(result, Err(GatewayError::Conflict { title }) if title == "Food"));
        assert_eq!(gateway.categories().len(), 1);
    }

    #[tokio::test]
    async fn save_categories_rejects_duplicates_within_batch() {
        let gateway = MemoryGateway::new();
        let drafts = gateway.create_categories(&titles(&["Food", "Food"]));
        assert!(gateway.save_categories(drafts).await.is_err());
        assert!(gateway.categories().is_empty());
    }

    #[tokio::test]
    async fn save_transactions_rejects_dangling_category() {
        let gateway = MemoryGateway::with_categories(&["Food"]);
        let mut ghost = gateway.categories()[0].clone();
        ghost.id = CategoryId(99);

        let draft = TransactionDraft {
            title: "Lunch".to_string(),
            kind: TransactionType::Outcome,
            value: Money::from_cents(1250),
            category: ghost,
        };
        let result = gateway.save_transactions(vec![draft]).await;
        assert!(matches!(result, Err(GatewayError::DanglingCategory(CategoryId(99)))));
        assert!(gateway.transactions().is_empty());
    }

    #[tokio::test]
    async fn save_transactions_assigns_ids_in_order() {
        let gateway = MemoryGateway::with_categories(&["Food"]);
        let food = gateway.categories()[0].clone();
        let drafts = ["Lunch", "Dinner"]
            .iter()
            .map(|title| TransactionDraft {
                title: title.to_string(),
                kind: TransactionType::Outcome,
                value: Money::from_cents(1000),
                category: food.clone(),
            })
            .collect();

        let saved = gateway.save_transactions(drafts).await.unwrap();
        assert_eq!(saved[0].id, TransactionId(1));
        assert_eq!(saved[1].id, TransactionId(2));
        assert_eq!(saved[1].title, "Dinner");
    }
}
