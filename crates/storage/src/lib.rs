pub mod db;
pub mod gateway;

pub use db::{create_db, get_all_categories, get_all_transactions, get_balance, DbPool};
pub use gateway::SqliteGateway;
