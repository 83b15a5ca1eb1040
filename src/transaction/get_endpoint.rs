use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    database_id::TransactionId,
    envelope::{self, SingleTransaction},
    transaction::{TransactionStoreState, error_response},
};

/// A route handler for getting a transaction by its ID.
///
/// Responds with 404 if the transaction does not exist (e.g., not created yet
/// or already deleted).
pub async fn get_transaction_endpoint(
    State(state): State<TransactionStoreState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.store.get(&transaction_id) {
        Ok(transaction) => envelope::success(
            StatusCode::OK,
            SingleTransaction { transaction },
            "Transaction retrieved successfully",
        ),
        Err(error) => error_response(error, "Failed to fetch transaction"),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        Envelope, Failure, SingleTransaction, build_router,
        endpoints::{self, format_endpoint},
        test_utils::{FailingStore, must_create_transaction, test_server},
    };

    #[tokio::test]
    async fn get_transaction() {
        let server = test_server();
        let inserted =
            must_create_transaction(&server, json!({"amount": -10.0, "type": "expense"})).await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, inserted.id.as_str()))
            .await;

        response.assert_status_ok();
        let body = response.json::<Envelope<SingleTransaction>>();
        assert!(body.success);
        assert_eq!(body.message, "Transaction retrieved successfully");
        assert_eq!(body.payload.transaction, inserted);
    }

    #[tokio::test]
    async fn get_missing_transaction_is_not_found() {
        let server = test_server();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, "nope"))
            .await;

        response.assert_status_not_found();
        let body = response.json::<Envelope<Failure>>();
        assert!(!body.success);
        assert_eq!(body.message, "Transaction not found");
    }

    #[tokio::test]
    async fn store_fault_is_internal_error() {
        let server = TestServer::try_new(build_router(FailingStore::state())).unwrap();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, "any"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Envelope<Failure>>().message,
            "Failed to fetch transaction"
        );
    }
}
