//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, ToSql, params_from_iter};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    envelope::ConnectionCheck,
    transaction::{
        core::{NewTransaction, Transaction, TransactionPatch, TransactionQuery, format_timestamp},
        store::TransactionStore,
    },
};

const SELECT_COLUMNS: &str =
    "SELECT id, amount, description, category, type, date, created_at, updated_at FROM \"transaction\"";

/// Stores transactions as rows in a SQLite database, one row per document.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The tables must already exist, see [initialize](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert a new transaction with a freshly generated ID.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is some SQL error.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\"
                    (id, amount, description, category, type, date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 RETURNING id, amount, description, category, type, date, created_at, updated_at",
            )?
            .query_row(
                (
                    TransactionId::generate(),
                    transaction.amount,
                    transaction.description,
                    transaction.category,
                    transaction.kind,
                    transaction.date,
                    transaction.created_at,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    /// Query for transactions in the database, newest first.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![SELECT_COLUMNS.to_owned()];
        let mut where_clause_parts = vec![];
        let mut query_parameters: Vec<Box<dyn ToSql>> = vec![];

        if let Some(ref category) = query.category {
            query_parameters.push(Box::new(category.clone()));
            where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
        }

        if let Some(kind) = query.kind {
            query_parameters.push(Box::new(kind));
            where_clause_parts.push(format!("type = ?{}", query_parameters.len()));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        query_string_parts.push("ORDER BY created_at DESC, rowid DESC".to_owned());

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit}"));
        }

        let query_string = query_string_parts.join(" ");
        let connection = self.lock()?;
        let mut statement = connection.prepare(&query_string)?;

        let transactions = statement
            .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect();

        transactions
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: &TransactionId) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        select_transaction(id, &connection)
    }

    /// Update the columns present in `patch` and refresh `updated_at`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn update(&self, id: &TransactionId, patch: TransactionPatch) -> Result<Transaction, Error> {
        let mut set_clause_parts = vec![];
        let mut query_parameters: Vec<Box<dyn ToSql>> = vec![];

        let mut set = |column: &str, value: Box<dyn ToSql>| {
            query_parameters.push(value);
            set_clause_parts.push(format!("{column} = ?{}", query_parameters.len()));
        };

        if let Some(amount) = patch.amount {
            set("amount", Box::new(amount));
        }
        if let Some(description) = patch.description {
            set("description", Box::new(description));
        }
        if let Some(category) = patch.category {
            set("category", Box::new(category));
        }
        if let Some(kind) = patch.kind {
            set("type", Box::new(kind));
        }
        if let Some(date) = patch.date {
            set("date", Box::new(date));
        }
        set("updated_at", Box::new(patch.updated_at));

        query_parameters.push(Box::new(id.clone()));
        let query_string = format!(
            "UPDATE \"transaction\" SET {} WHERE id = ?{}",
            set_clause_parts.join(", "),
            query_parameters.len()
        );

        let connection = self.lock()?;
        let rows_affected =
            connection.execute(&query_string, params_from_iter(query_parameters.iter()))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        select_transaction(id, &connection)
    }

    /// Delete the transaction `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&self, id: &TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    /// Overwrite the single connection test row and read it back.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is some SQL error.
    fn ping(&self, now: OffsetDateTime) -> Result<ConnectionCheck, Error> {
        let timestamp = format_timestamp(now)?;
        let connection = self.lock()?;

        connection.execute(
            "INSERT OR REPLACE INTO connection_test (id, message, timestamp) VALUES (1, ?1, ?2)",
            ("Database connection successful", timestamp),
        )?;

        let check = connection.query_row(
            "SELECT message, timestamp FROM connection_test WHERE id = 1",
            [],
            |row| {
                Ok(ConnectionCheck {
                    message: row.get(0)?,
                    timestamp: row.get(1)?,
                })
            },
        )?;

        Ok(check)
    }
}

fn select_transaction(id: &TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", id)], map_transaction_row)?;

    Ok(transaction)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Backs the category/type filters on the list endpoint.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category_type ON \"transaction\"(category, type);",
        (),
    )?;

    Ok(())
}

/// Create the single-row table written by [TransactionStore::ping].
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_connection_test_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS connection_test (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                message TEXT NOT NULL,
                timestamp TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let category = row.get(3)?;
    let kind = row.get(4)?;
    let date = row.get(5)?;
    let created_at = row.get(6)?;
    let updated_at = row.get(7)?;

    Ok(Transaction {
        id,
        amount,
        description,
        category,
        kind,
        date,
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
