//! Defines the transaction store trait.

use std::{fmt::Debug, sync::Arc};

use axum::extract::FromRef;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    envelope::ConnectionCheck,
    transaction::core::{NewTransaction, Transaction, TransactionPatch, TransactionQuery},
};

/// Handles the creation, retrieval, modification and removal of transaction
/// documents.
///
/// Each operation touches a single document and is atomic. There are no
/// operations spanning several documents.
pub trait TransactionStore: Debug + Send + Sync {
    /// Store a new transaction and return it with its assigned ID.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve the transactions matching `query`.
    ///
    /// Implementations should return the most recently created transactions
    /// first, but callers must not rely on the order.
    fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a transaction by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn get(&self, id: &TransactionId) -> Result<Transaction, Error>;

    /// Apply `patch` to the transaction `id` and return the updated record.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn update(&self, id: &TransactionId, patch: TransactionPatch) -> Result<Transaction, Error>;

    /// Remove the transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn delete(&self, id: &TransactionId) -> Result<(), Error>;

    /// Write a test document stamped with `now` and read it back.
    fn ping(&self, now: OffsetDateTime) -> Result<ConnectionCheck, Error>;
}

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionStoreState {
    /// The store holding the transaction documents.
    pub store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionStoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
        }
    }
}
