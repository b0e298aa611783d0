pub mod error;
pub mod materialize;
pub mod reconcile;
pub mod service;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ImportError;
pub use materialize::materialize;
pub use reconcile::{distinct_titles, reconcile, CategoryMap};
pub use service::{ImportStage, ImportTransactions};
pub use source::{ParsedBatch, RawRow, RowSource};
