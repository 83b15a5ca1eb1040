//! The JSON envelope wrapped around every API response.
//!
//! Successful responses look like `{"success": true, ...payload, "message": "..."}`
//! and failures like `{"success": false, "error": "...", "message": "..."}`.
//! The payload types are shared with [ApiClient](crate::ApiClient) so both
//! sides agree on the wire format.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{database_id::TransactionId, transaction::Transaction};

/// A response body: a success flag, the flattened payload and a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// The endpoint specific fields.
    #[serde(flatten)]
    pub payload: T,
    /// A human readable summary of the outcome.
    pub message: String,
}

/// Payload for responses that carry nothing besides the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

/// Payload of a failed request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// The underlying error, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The request fields the server received, echoed back on validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
}

/// Payload of `POST /api/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCreated {
    /// The ID assigned by the store.
    pub id: TransactionId,
    /// The stored record.
    pub transaction: Transaction,
}

/// Payload of `GET /api/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionList {
    /// The retrieved records.
    pub transactions: Vec<Transaction>,
    /// The number of records in `transactions`.
    pub count: usize,
}

/// Payload of the endpoints that operate on a single transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleTransaction {
    /// The record.
    pub transaction: Transaction,
}

/// Body of `GET /api/health`. Not wrapped in an [Envelope].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always "Backend is running".
    pub status: String,
    /// When the server handled the request.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// The document written and read back by `GET /api/db-test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCheck {
    /// The message stored in the test document.
    pub message: String,
    /// When the test document was written, as an RFC 3339 string.
    pub timestamp: String,
}

/// Payload of `GET /api/db-test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ConnectionCheckPayload {
    pub data: ConnectionCheck,
}

/// Build a successful response.
pub(crate) fn success<T: Serialize>(status: StatusCode, payload: T, message: &str) -> Response {
    let body = Envelope {
        success: true,
        payload,
        message: message.to_owned(),
    };

    (status, Json(body)).into_response()
}

/// Build a failed response.
pub(crate) fn failure(
    status: StatusCode,
    error: Option<String>,
    message: &str,
    received: Option<Value>,
) -> Response {
    let body = Envelope {
        success: false,
        payload: Failure { error, received },
        message: message.to_owned(),
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Empty, Envelope, Failure};

    #[test]
    fn payload_is_flattened_into_envelope() {
        let envelope = Envelope {
            success: true,
            payload: Empty {},
            message: "Transaction deleted successfully".to_owned(),
        };

        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            json!({"success": true, "message": "Transaction deleted successfully"})
        );
    }

    #[test]
    fn failure_omits_absent_fields() {
        let envelope = Envelope {
            success: false,
            payload: Failure {
                error: None,
                received: None,
            },
            message: "Transaction not found".to_owned(),
        };

        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            json!({"success": false, "message": "Transaction not found"})
        );
    }

    #[test]
    fn failure_round_trips_through_json() {
        let text = r#"{"success":false,"error":"boom","message":"Failed to fetch transactions"}"#;

        let envelope: Envelope<Failure> = serde_json::from_str(text).unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.payload.error.as_deref(), Some("boom"));
        assert_eq!(envelope.message, "Failed to fetch transactions");
    }
}
