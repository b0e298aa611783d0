use tally_core::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed record at line {line}: expected 4 fields, found {fields}")]
    MalformedRecord { line: u64, fields: usize },
    #[error("Category '{title}' was created concurrently by another import")]
    ReconciliationConflict { title: String },
    /// A row's category was not in the reconciled map. Reconciliation is
    /// given every title in the batch, so this indicates a bug.
    #[error("No resolved category for title '{0}'")]
    UnresolvedCategory(String),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] GatewayError),
}
