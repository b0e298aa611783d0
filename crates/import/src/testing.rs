use async_trait::async_trait;
use std::path::PathBuf;
use tally_core::{
    Category, CategoryDraft, GatewayError, LedgerGateway, MemoryGateway, Transaction,
    TransactionDraft,
};

/// Writes `body` to a fresh file inside `dir`.
pub fn write_csv(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile_in(dir.path())
        .unwrap()
        .into_temp_path()
        .keep()
        .unwrap();
    std::fs::write(&path, body).unwrap();
    path
}

/// A gateway whose lookups never see existing categories, standing in for
/// a concurrent import that committed after this one looked.
pub struct StaleGateway {
    inner: MemoryGateway,
}

impl StaleGateway {
    pub fn new(inner: MemoryGateway) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &MemoryGateway {
        &self.inner
    }
}

#[async_trait]
impl LedgerGateway for StaleGateway {
    async fn find_categories_by_title(
        &self,
        _titles: &[String],
    ) -> Result<Vec<Category>, GatewayError> {
        Ok(Vec::new())
    }

    async fn save_categories(
        &self,
        drafts: Vec<CategoryDraft>,
    ) -> Result<Vec<Category>, GatewayError> {
        self.inner.save_categories(drafts).await
    }

    async fn save_transactions(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, GatewayError> {
        self.inner.save_transactions(drafts).await
    }
}
