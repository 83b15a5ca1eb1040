//! Route handlers for checking that the server and its database are up.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    envelope::{self, ConnectionCheckPayload, HealthStatus},
    transaction::TransactionStoreState,
};

/// Report that the server is running. Does not touch the database.
pub async fn get_health() -> Response {
    Json(HealthStatus {
        status: "Backend is running".to_owned(),
        timestamp: OffsetDateTime::now_utc(),
    })
    .into_response()
}

/// Write a test document to the database and read it back.
pub async fn get_db_test(State(state): State<TransactionStoreState>) -> Response {
    match state.store.ping(OffsetDateTime::now_utc()) {
        Ok(data) => envelope::success(
            StatusCode::OK,
            ConnectionCheckPayload { data },
            "Database connection working!",
        ),
        Err(error) => error.into_envelope("Database connection failed"),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{
        Envelope, Failure, HealthStatus, build_router, endpoints,
        envelope::ConnectionCheckPayload,
        test_utils::{FailingStore, test_server},
    };

    #[tokio::test]
    async fn health_reports_running() {
        let server = test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        let body = response.json::<HealthStatus>();
        assert_eq!(body.status, "Backend is running");
    }

    #[tokio::test]
    async fn health_does_not_need_the_database() {
        let server = TestServer::try_new(build_router(FailingStore::state())).unwrap();

        server.get(endpoints::HEALTH).await.assert_status_ok();
    }

    #[tokio::test]
    async fn db_test_reads_back_test_document() {
        let server = test_server();

        let response = server.get(endpoints::DB_TEST).await;

        response.assert_status_ok();
        let body = response.json::<Envelope<ConnectionCheckPayload>>();
        assert!(body.success);
        assert_eq!(body.message, "Database connection working!");
        assert_eq!(body.payload.data.message, "Database connection successful");
        assert!(!body.payload.data.timestamp.is_empty());
    }

    #[tokio::test]
    async fn db_test_can_run_repeatedly() {
        let server = test_server();

        server.get(endpoints::DB_TEST).await.assert_status_ok();
        server.get(endpoints::DB_TEST).await.assert_status_ok();
    }

    #[tokio::test]
    async fn db_test_reports_store_fault() {
        let server = TestServer::try_new(build_router(FailingStore::state())).unwrap();

        let response = server.get(endpoints::DB_TEST).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Envelope<Failure>>();
        assert!(!body.success);
        assert_eq!(body.message, "Database connection failed");
        assert!(body.payload.error.is_some());
    }
}
