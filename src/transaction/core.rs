//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// The description stored when the client does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// The category stored when the client does not provide one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money was spent.
    Expense,
    /// Money was earned.
    Income,
}

impl TransactionType {
    /// The name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }

    /// Apply the direction of the transaction to the magnitude of `amount`:
    /// expenses are negative and income is positive.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Expense => -amount.abs(),
            TransactionType::Income => amount.abs(),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(Error::InvalidField {
                field: "type",
                reason: format!("expected \"expense\" or \"income\", got \"{other}\""),
            }),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income as stored on the server.
///
/// The server stores `amount` as it was received and keeps the direction in
/// `kind`. Use [TransactionType::signed] to get a signed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID assigned by the store.
    pub id: TransactionId,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The spending or income category, e.g. "Food" or "Salary".
    pub category: String,
    /// Whether this is an expense or income.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction happened, as provided by the client.
    pub date: String,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last written.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated transaction that has not been stored yet.
///
/// Build one from a request with
/// [CreateTransactionRequest::validate](crate::CreateTransactionRequest::validate).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Trimmed, never empty.
    pub description: String,
    /// Never empty.
    pub category: String,
    /// Whether this is an expense or income.
    pub kind: TransactionType,
    /// When the transaction happened.
    pub date: String,
    /// The creation time, also used as the initial update time.
    pub created_at: OffsetDateTime,
}

/// A partial update. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPatch {
    /// The new amount.
    pub amount: Option<f64>,
    /// The new description.
    pub description: Option<String>,
    /// The new category.
    pub category: Option<String>,
    /// The new direction.
    pub kind: Option<TransactionType>,
    /// The new date.
    pub date: Option<String>,
    /// Always written.
    pub updated_at: OffsetDateTime,
}

impl TransactionPatch {
    /// A patch that only refreshes the update time.
    pub fn touch(updated_at: OffsetDateTime) -> Self {
        Self {
            amount: None,
            description: None,
            category: None,
            kind: None,
            date: None,
            updated_at,
        }
    }
}

/// Defines which transactions should be fetched from
/// [TransactionStore::list](crate::TransactionStore::list).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u32>,
    /// Only include transactions in this category.
    pub category: Option<String>,
    /// Only include expenses or only income.
    pub kind: Option<TransactionType>,
}

/// Format `timestamp` as an RFC 3339 string, e.g. "2025-10-17T09:30:00Z".
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .format(&Rfc3339)
        .map_err(|error| Error::TimestampFormat(error.to_string()))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{Error, transaction::core::format_timestamp};

    use super::TransactionType;

    #[test]
    fn parses_transaction_types() {
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
        assert_eq!(" income ".parse(), Ok(TransactionType::Income));
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        let result = "transfer".parse::<TransactionType>();

        assert!(matches!(result, Err(Error::InvalidField { field: "type", .. })));
    }

    #[test]
    fn signed_amount_follows_direction() {
        assert_eq!(TransactionType::Expense.signed(50.0), -50.0);
        assert_eq!(TransactionType::Expense.signed(-50.0), -50.0);
        assert_eq!(TransactionType::Income.signed(200.0), 200.0);
        assert_eq!(TransactionType::Income.signed(-200.0), 200.0);
    }

    #[test]
    fn formats_rfc3339_timestamps() {
        let formatted = format_timestamp(datetime!(2025-10-17 09:30:00 UTC)).unwrap();

        assert_eq!(formatted, "2025-10-17T09:30:00Z");
    }
}
