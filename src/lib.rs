//! Tally is a personal finance tracker.
//!
//! This library provides:
//! - a JSON REST API for recording income and expense transactions in a
//!   document-style store (see [build_router]),
//! - a typed client for that API (see [ApiClient]),
//! - the client-side budget model: the session state machine, budget
//!   allocation across spending categories, the running balance and the pie
//!   chart of the allocation (see the [budget] module).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod budget;
mod client;
mod database_id;
mod db;
mod endpoints;
mod envelope;
mod health;
mod html;
mod logging;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use client::{ApiClient, ClientConfig, ClientError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use envelope::{
    ConnectionCheck, Empty, Envelope, Failure, HealthStatus, SingleTransaction,
    TransactionCreated, TransactionList,
};
pub use html::format_currency;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    AmountInput, CreateTransactionRequest, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION,
    DEFAULT_LIST_LIMIT, ListTransactionsQuery, NewTransaction, SQLiteTransactionStore,
    Transaction, TransactionPatch, TransactionQuery, TransactionStore, TransactionType,
    UpdateTransactionRequest,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not install the Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were absent (or blank) in a request body.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A field was present but its value could not be accepted, e.g. an
    /// amount that is not a number or a transaction type other than
    /// `expense` or `income`.
    #[error("invalid value for \"{field}\": {reason}")]
    InvalidField {
        /// The name of the offending field as it appears in the JSON body.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The request body or query string could not be parsed at all.
    #[error("could not parse request: {0}")]
    MalformedBody(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the resource has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A timestamp could not be formatted as an RFC 3339 string.
    #[error("could not format timestamp: {0}")]
    TimestampFormat(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that corresponds to this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_) | Error::InvalidField { .. } | Error::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError | Error::TimestampFormat(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert the error into a JSON failure envelope with `message` as the
    /// human readable summary.
    ///
    /// Server-side faults are logged here so that handlers do not need to.
    pub(crate) fn into_envelope(self, message: &str) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{message}: {self}");
        } else {
            tracing::debug!("{message}: {self}");
        }

        envelope::failure(status, Some(self.to_string()), message, None)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match self.status_code() {
            StatusCode::BAD_REQUEST => "Invalid request",
            StatusCode::NOT_FOUND => "Resource not found",
            _ => "Internal server error",
        };

        self.into_envelope(message)
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(
            Error::MissingFields(vec!["amount"]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidField {
                field: "type",
                reason: "nope".to_owned()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn store_faults_are_internal_errors() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_fields_lists_every_field() {
        let error = Error::MissingFields(vec!["amount", "type"]);

        assert_eq!(error.to_string(), "missing required fields: amount, type");
    }
}
