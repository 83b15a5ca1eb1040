use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use time::OffsetDateTime;

use crate::{
    Error,
    envelope::{self, TransactionCreated},
    transaction::{CreateTransactionRequest, TransactionStoreState, error_response},
};

const FAILURE_MESSAGE: &str = "Failed to create transaction";

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored record, or 400 echoing the received
/// fields when `amount` or `type` is missing.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionStoreState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Error::MalformedBody(rejection.body_text()).into_envelope(FAILURE_MESSAGE);
        }
    };

    tracing::debug!("Received transaction data: {request:?}");
    let received = request.clone();

    let new_transaction = match request.validate(OffsetDateTime::now_utc()) {
        Ok(new_transaction) => new_transaction,
        Err(error @ Error::MissingFields(_)) => {
            tracing::debug!("Validation failed: {error}");
            return envelope::failure(
                StatusCode::BAD_REQUEST,
                Some(error.to_string()),
                "Amount and type are required",
                serde_json::to_value(&received).ok(),
            );
        }
        Err(error) => return error.into_envelope(FAILURE_MESSAGE),
    };

    match state.store.create(new_transaction) {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            envelope::success(
                StatusCode::CREATED,
                TransactionCreated {
                    id: transaction.id.clone(),
                    transaction,
                },
                "Transaction created successfully",
            )
        }
        Err(error) => error_response(error, FAILURE_MESSAGE),
    }
}
