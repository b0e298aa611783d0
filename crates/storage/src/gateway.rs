use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, Sqlite};
use tally_core::{
    Category, CategoryDraft, GatewayError, LedgerGateway, Transaction, TransactionDraft,
    TransactionId,
};

use crate::db::{category_from_row, CategoryRow, DbPool};

/// Stays well under SQLite's bound-parameter limit for the `IN (...)` lookup.
const MAX_BIND_PARAMS: usize = 900;

#[derive(Debug, Clone)]
pub struct SqliteGateway {
    pool: DbPool,
}

impl SqliteGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn backend(err: sqlx::Error) -> GatewayError {
    GatewayError::Backend(Box::new(err))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl LedgerGateway for SqliteGateway {
    async fn find_categories_by_title(
        &self,
        titles: &[String],
    ) -> Result<Vec<Category>, GatewayError> {
        let mut found = Vec::new();

        for chunk in titles.chunks(MAX_BIND_PARAMS) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "SELECT id, title, created_at FROM categories WHERE title IN (",
            );
            let mut separated = query.separated(", ");
            for title in chunk {
                separated.push_bind(title.clone());
            }
            separated.push_unseparated(")");

            let rows = query
                .build_query_as::<CategoryRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
            found.extend(rows.into_iter().map(category_from_row));
        }

        tracing::debug!(requested = titles.len(), found = found.len(), "category lookup");
        Ok(found)
    }

    async fn save_categories(
        &self,
        drafts: Vec<CategoryDraft>,
    ) -> Result<Vec<Category>, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut saved = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let row = sqlx::query_as::<_, CategoryRow>(
                "INSERT INTO categories (title) VALUES (?) RETURNING id, title, created_at",
            )
            .bind(&draft.title)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    GatewayError::Conflict { title: draft.title.clone() }
                } else {
                    backend(e)
                }
            })?;
            saved.push(category_from_row(row));
        }

        tx.commit().await.map_err(backend)?;
        tracing::debug!(created = saved.len(), "categories saved");
        Ok(saved)
    }

    async fn save_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut saved = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let cents = draft
                .value
                .to_cents()
                .ok_or_else(|| GatewayError::InvalidValue(draft.value.to_string()))?;

            let (id, created_at) = sqlx::query_as::<_, (i64, NaiveDateTime)>(
                "INSERT INTO transactions (title, type, value_cents, category_id) VALUES (?, ?, ?, ?) RETURNING id, created_at",
            )
            .bind(&draft.title)
            .bind(draft.kind.to_string())
            .bind(cents)
            .bind(draft.category.id.0)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    GatewayError::DanglingCategory(draft.category.id)
                } else {
                    backend(e)
                }
            })?;

            saved.push(Transaction {
                id: TransactionId(id),
                title: draft.title,
                kind: draft.kind,
                value: draft.value,
                category: draft.category,
                created_at,
            });
        }

        tx.commit().await.map_err(backend)?;
        tracing::debug!(saved = saved.len(), "transactions saved");
        Ok(saved)
    }
}
