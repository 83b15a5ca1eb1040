use std::{sync::Arc, time::Duration};

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::net::TcpListener;

use crate::{
    ApiClient, AppState, ClientConfig, Envelope, Error, Transaction, TransactionCreated,
    TransactionId, build_router, endpoints,
    envelope::ConnectionCheck,
    transaction::{NewTransaction, TransactionPatch, TransactionQuery, TransactionStore},
};

pub(crate) fn in_memory_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");

    AppState::new(connection).expect("could not initialize test DB")
}

pub(crate) fn test_server() -> TestServer {
    TestServer::try_new(build_router(in_memory_state())).expect("Could not create test server.")
}

/// Serve the API on a random local port and return a client for it.
pub(crate) async fn spawn_api() -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind test listener");
    let address = listener
        .local_addr()
        .expect("could not get test listener address");
    let app = build_router(in_memory_state());
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("test server stopped unexpectedly");
    });

    ApiClient::new(ClientConfig {
        base_url: format!("http://{address}/api"),
        timeout: Duration::from_secs(5),
    })
    .expect("could not create API client")
}

/// POST `body` to the transactions endpoint and return the stored record.
pub(crate) async fn must_create_transaction(server: &TestServer, body: Value) -> Transaction {
    let response = server.post(endpoints::TRANSACTIONS_API).json(&body).await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response
        .json::<Envelope<TransactionCreated>>()
        .payload
        .transaction
}

/// A store whose every operation fails as if the database were unreachable.
#[derive(Debug)]
pub(crate) struct FailingStore;

impl FailingStore {
    pub(crate) fn state() -> AppState {
        AppState::with_store(Arc::new(FailingStore))
    }
}

impl TransactionStore for FailingStore {
    fn create(&self, _: NewTransaction) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn list(&self, _: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _: &TransactionId) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn update(&self, _: &TransactionId, _: TransactionPatch) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete(&self, _: &TransactionId) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn ping(&self, _: OffsetDateTime) -> Result<ConnectionCheck, Error> {
        Err(Error::DatabaseLockError)
    }
}
