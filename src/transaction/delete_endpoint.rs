use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    database_id::TransactionId,
    envelope::{self, Empty},
    transaction::{TransactionStoreState, error_response},
};

/// A route handler for deleting a transaction, responds with 404 if the
/// transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionStoreState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.store.delete(&transaction_id) {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            envelope::success(StatusCode::OK, Empty {}, "Transaction deleted successfully")
        }
        Err(error) => error_response(error, "Failed to delete transaction"),
    }
}
