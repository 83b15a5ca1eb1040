//! A typed HTTP client for the transactions API.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    database_id::TransactionId,
    envelope::{
        Empty, Envelope, Failure, HealthStatus, SingleTransaction, TransactionCreated,
        TransactionList,
    },
    transaction::{
        CreateTransactionRequest, ListTransactionsQuery, Transaction, UpdateTransactionRequest,
    },
};

/// The API location used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// How long a request may take when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to find the API and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The URL the API paths are appended to, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    /// The timeout for each request.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The errors that can occur when talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be created.
    #[error("could not build the HTTP client: {0}")]
    Build(reqwest::Error),

    /// The request could not be sent or the response could not be read,
    /// e.g. the server is down or the request timed out.
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    /// The server responded with an error status.
    #[error("server responded with {status}: {message}")]
    Status {
        /// The HTTP status of the response.
        status: StatusCode,
        /// The message from the response envelope, or the status reason.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(serde_json::Error),
}

impl ClientError {
    /// Whether the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        )
    }
}

/// Calls the transactions API.
///
/// Failures are logged and returned to the caller. Nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API described by `config`.
    ///
    /// # Errors
    /// Returns [ClientError::Build] if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                tracing::error!("Could not build HTTP client: {error}");
                ClientError::Build(error)
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Check that the server is running.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.send(self.request(Method::GET, "/health")).await
    }

    /// Store a new transaction and return the stored record.
    pub async fn create(
        &self,
        transaction: &CreateTransactionRequest,
    ) -> Result<Transaction, ClientError> {
        let created: Envelope<TransactionCreated> = self
            .send(self.request(Method::POST, "/transactions").json(transaction))
            .await?;

        Ok(created.payload.transaction)
    }

    /// Fetch the transactions matching `query`.
    pub async fn list(
        &self,
        query: &ListTransactionsQuery,
    ) -> Result<Vec<Transaction>, ClientError> {
        let list: Envelope<TransactionList> = self
            .send(self.request(Method::GET, "/transactions").query(query))
            .await?;

        Ok(list.payload.transactions)
    }

    /// Fetch the transaction `id`.
    pub async fn get(&self, id: &TransactionId) -> Result<Transaction, ClientError> {
        let single: Envelope<SingleTransaction> = self
            .send(self.request(Method::GET, &transaction_path(id)))
            .await?;

        Ok(single.payload.transaction)
    }

    /// Change the fields set in `changes` on the transaction `id`.
    pub async fn update(
        &self,
        id: &TransactionId,
        changes: &UpdateTransactionRequest,
    ) -> Result<Transaction, ClientError> {
        let single: Envelope<SingleTransaction> = self
            .send(self.request(Method::PUT, &transaction_path(id)).json(changes))
            .await?;

        Ok(single.payload.transaction)
    }

    /// Delete the transaction `id`.
    pub async fn delete(&self, id: &TransactionId) -> Result<(), ClientError> {
        let _: Envelope<Empty> = self
            .send(self.request(Method::DELETE, &transaction_path(id)))
            .await?;

        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|error| {
            tracing::error!("API request failed: {error}");
            ClientError::Request(error)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| {
            tracing::error!("Could not read API response: {error}");
            ClientError::Request(error)
        })?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<Envelope<Failure>>(&body) {
                Ok(envelope) => envelope.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_owned(),
            };
            tracing::error!("API responded with {status}: {message}");

            return Err(ClientError::Status { status, message });
        }

        serde_json::from_slice(&body).map_err(|error| {
            tracing::error!("Could not decode API response: {error}");
            ClientError::Decode(error)
        })
    }
}

fn transaction_path(id: &TransactionId) -> String {
    format!("/transactions/{id}")
}
