//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions on the server:
//! - The `Transaction` model and the request schemas used to create and update it
//! - The `TransactionStore` trait and its SQLite implementation
//! - The JSON route handlers for `/api/transactions`

use axum::response::Response;

use crate::Error;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod request;
mod sqlite_store;
mod store;

pub use core::{
    DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, NewTransaction, Transaction, TransactionPatch,
    TransactionQuery, TransactionType,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{DEFAULT_LIST_LIMIT, ListTransactionsQuery, list_transactions_endpoint};
pub use request::{AmountInput, CreateTransactionRequest, UpdateTransactionRequest};
pub use sqlite_store::{
    SQLiteTransactionStore, create_connection_test_table, create_transaction_table,
};
pub use store::{TransactionStore, TransactionStoreState};

/// The message sent with a 404 response for a missing transaction.
pub const NOT_FOUND_MESSAGE: &str = "Transaction not found";

/// Convert `error` into a failure envelope, using the shared 404 message when
/// the transaction does not exist and `message` otherwise.
fn error_response(error: Error, message: &str) -> Response {
    match error {
        Error::NotFound => error.into_envelope(NOT_FOUND_MESSAGE),
        error => error.into_envelope(message),
    }
}
