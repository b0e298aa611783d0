use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use tally_core::{
    Balance, Category, CategoryId, Money, Transaction, TransactionId, TransactionType,
};

pub type DbPool = Pool<Sqlite>;

pub(crate) type CategoryRow = (i64, String, NaiveDateTime);

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000))
        .pragma("cache_size", "-32000");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
            value_cents INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub(crate) fn category_from_row(r: CategoryRow) -> Category {
    Category {
        id: CategoryId(r.0),
        title: r.1,
        created_at: r.2,
    }
}

pub(crate) fn parse_type(s: &str) -> Result<TransactionType, sqlx::Error> {
    s.parse::<TransactionType>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "type".to_string(),
            source: e.into(),
        })
}

pub async fn get_all_categories(pool: &DbPool) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, title, created_at FROM categories ORDER BY title",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(category_from_row).collect())
}

pub async fn get_all_transactions(pool: &DbPool) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query_as::<
        _,
        (i64, String, String, i64, NaiveDateTime, i64, String, NaiveDateTime),
    >(
        r#"
        SELECT t.id, t.title, t.type, t.value_cents, t.created_at,
               c.id, c.title, c.created_at
        FROM transactions t
        JOIN categories c ON c.id = t.category_id
        ORDER BY t.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| -> Result<Transaction, sqlx::Error> {
            Ok(Transaction {
                id: TransactionId(r.0),
                title: r.1,
                kind: parse_type(&r.2)?,
                value: Money::from_cents(r.3),
                created_at: r.4,
                category: category_from_row((r.5, r.6, r.7)),
            })
        })
        .collect()
}

pub async fn get_balance(pool: &DbPool) -> Result<Balance, sqlx::Error> {
    let (income, outcome) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN type = 'income' THEN value_cents END), 0),
            COALESCE(SUM(CASE WHEN type = 'outcome' THEN value_cents END), 0)
        FROM transactions
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(Balance::new(Money::from_cents(income), Money::from_cents(outcome)))
}
