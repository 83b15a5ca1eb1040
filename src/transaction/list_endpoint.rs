use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    envelope::{self, TransactionList},
    transaction::{TransactionQuery, TransactionStoreState, TransactionType, error_response},
};

/// The number of transactions returned when the client does not ask for a limit.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

const FAILURE_MESSAGE: &str = "Failed to fetch transactions";

/// The query string accepted by `GET /api/transactions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListTransactionsQuery {
    /// The maximum number of transactions to return, defaults to [DEFAULT_LIST_LIMIT].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only return transactions in this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Only return expenses or only income.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
}

impl From<ListTransactionsQuery> for TransactionQuery {
    fn from(query: ListTransactionsQuery) -> Self {
        TransactionQuery {
            limit: Some(query.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
            category: query
                .category
                .map(|category| category.trim().to_owned())
                .filter(|category| !category.is_empty()),
            kind: query.kind,
        }
    }
}

/// A route handler for listing transactions, optionally filtered by category
/// and type.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionStoreState>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => TransactionQuery::from(query),
        Err(rejection) => {
            return Error::MalformedBody(rejection.body_text()).into_envelope(FAILURE_MESSAGE);
        }
    };

    match state.store.list(&query) {
        Ok(transactions) => envelope::success(
            StatusCode::OK,
            TransactionList {
                count: transactions.len(),
                transactions,
            },
            "Transactions retrieved successfully",
        ),
        Err(error) => error_response(error, FAILURE_MESSAGE),
    }
}
