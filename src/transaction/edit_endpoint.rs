use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    envelope::{self, SingleTransaction},
    transaction::{TransactionStoreState, UpdateTransactionRequest, error_response},
};

const FAILURE_MESSAGE: &str = "Failed to update transaction";

/// A route handler for updating a transaction.
///
/// Only the fields present in the body are changed, `updatedAt` is always
/// refreshed.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionStoreState>,
    Path(transaction_id): Path<TransactionId>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Error::MalformedBody(rejection.body_text()).into_envelope(FAILURE_MESSAGE);
        }
    };

    tracing::debug!("Updating transaction {transaction_id} with {request:?}");

    let patch = match request.into_patch(OffsetDateTime::now_utc()) {
        Ok(patch) => patch,
        Err(error) => return error.into_envelope(FAILURE_MESSAGE),
    };

    match state.store.update(&transaction_id, patch) {
        Ok(transaction) => envelope::success(
            StatusCode::OK,
            SingleTransaction { transaction },
            "Transaction updated successfully",
        ),
        Err(error) => error_response(error, FAILURE_MESSAGE),
    }
}
