pub mod balance;
pub mod category;
pub mod gateway;
pub mod memory;
pub mod money;
pub mod transaction;

pub use balance::Balance;
pub use category::{Category, CategoryDraft, CategoryId};
pub use gateway::{GatewayError, LedgerGateway};
pub use memory::MemoryGateway;
pub use money::Money;
pub use transaction::{
    NewTransaction, Transaction, TransactionDraft, TransactionId, TransactionType,
};
