//! Sets up the application's SQLite database.

use rusqlite::Connection;

use crate::transaction::{create_connection_test_table, create_transaction_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_transaction_table(connection)?;
    create_connection_test_table(connection)?;

    Ok(())
}
