use std::fmt;
use std::path::Path;
use tally_core::{LedgerGateway, Transaction};

use crate::error::ImportError;
use crate::materialize::materialize;
use crate::reconcile::reconcile;
use crate::source::RowSource;

/// Steps of one import, in the only order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Parsing,
    Reconciling,
    Materializing,
    Persisting,
    CleaningUp,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStage::Parsing => write!(f, "parsing"),
            ImportStage::Reconciling => write!(f, "reconciling"),
            ImportStage::Materializing => write!(f, "materializing"),
            ImportStage::Persisting => write!(f, "persisting"),
            ImportStage::CleaningUp => write!(f, "cleaning_up"),
        }
    }
}

/// Imports one transaction file into the ledger behind `gateway`.
///
/// The file is read to the end before any category is looked up, so the
/// reconciler sees the batch's full set of titles at once. On success the
/// file is deleted; on any failure it is left in place for a retry.
pub struct ImportTransactions<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G> ImportTransactions<'a, G>
where
    G: LedgerGateway + ?Sized,
{
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, path: &Path) -> Result<Vec<Transaction>, ImportError> {
        let mut stage = ImportStage::Parsing;
        match self.run(path, &mut stage).await {
            Ok(transactions) => Ok(transactions),
            Err(e) => {
                tracing::warn!(%stage, path = %path.display(), error = %e, "import failed");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        path: &Path,
        stage: &mut ImportStage,
    ) -> Result<Vec<Transaction>, ImportError> {
        enter(stage, ImportStage::Parsing);
        let data = tokio::fs::read(path).await?;
        let batch = RowSource::new(data.as_slice()).drain()?;

        enter(stage, ImportStage::Reconciling);
        let categories = reconcile(self.gateway, &batch.category_titles).await?;

        enter(stage, ImportStage::Materializing);
        let new_transactions = materialize(&batch.rows, &categories)?;

        enter(stage, ImportStage::Persisting);
        let drafts = self.gateway.create_transactions(new_transactions)?;
        let transactions = self.gateway.save_transactions(drafts).await?;

        enter(stage, ImportStage::CleaningUp);
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "could not delete imported file");
        }

        tracing::info!(
            path = %path.display(),
            transactions = transactions.len(),
            categories = categories.len(),
            "import complete"
        );
        Ok(transactions)
    }
}

fn enter(current: &mut ImportStage, next: ImportStage) {
    *current = next;
    tracing::debug!(stage = %next, "import stage");
}
