//! Request schemas for creating and updating transactions.
//!
//! Bodies are deserialized into these types first and then validated, so
//! every rule about required fields, coercion and defaults lives here rather
//! than in the route handlers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::core::{
        DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, NewTransaction, TransactionPatch, TransactionType,
        format_timestamp,
    },
};

/// An amount as sent by a client: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `12.5`
    Number(f64),
    /// e.g. `"12.5"`
    Text(String),
}

impl AmountInput {
    /// An empty string or a numeric zero counts as no amount at all.
    fn is_blank(&self) -> bool {
        match self {
            AmountInput::Number(number) => *number == 0.0,
            AmountInput::Text(text) => text.trim().is_empty(),
        }
    }

    /// Coerce the input to a number.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if the text is not a number, or the
    /// number is zero, infinite or NaN.
    pub fn to_amount(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(number) => *number,
            AmountInput::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|error| Error::InvalidField {
                        field: "amount",
                        reason: format!("\"{text}\" is not a number: {error}"),
                    })?
            }
        };

        if !amount.is_finite() {
            return Err(Error::InvalidField {
                field: "amount",
                reason: format!("{amount} is not a finite number"),
            });
        }

        if amount == 0.0 {
            return Err(Error::InvalidField {
                field: "amount",
                reason: "amount cannot be zero".to_owned(),
            });
        }

        Ok(amount)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

/// The body of `POST /api/transactions`.
///
/// `amount` and `type` are required, everything else has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// Defaults to "No description".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to "Other".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Required, either "expense" or "income".
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Defaults to the creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CreateTransactionRequest {
    /// Check the request and fill in defaults, using `now` as the creation
    /// time and, if no date was given, as the transaction date.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if `amount` or `type` is absent or blank, or
    ///   `amount` is the number zero,
    /// - [Error::InvalidField] if `amount` or `type` has an unusable value,
    /// - or [Error::TimestampFormat] if `now` cannot be formatted.
    pub fn validate(self, now: OffsetDateTime) -> Result<NewTransaction, Error> {
        let mut missing = Vec::new();

        let amount = match self.amount {
            Some(ref amount) if !amount.is_blank() => Some(amount),
            _ => {
                missing.push("amount");
                None
            }
        };

        let kind = match self.kind.as_deref().map(str::trim) {
            Some(kind) if !kind.is_empty() => Some(kind),
            _ => {
                missing.push("type");
                None
            }
        };

        let (Some(amount), Some(kind)) = (amount, kind) else {
            return Err(Error::MissingFields(missing));
        };

        let amount = amount.to_amount()?;
        let kind: TransactionType = kind.parse()?;

        let date = match non_blank(self.date) {
            Some(date) => date,
            None => format_timestamp(now)?,
        };

        Ok(NewTransaction {
            amount,
            description: normalize_description(self.description),
            category: normalize_category(self.category),
            kind,
            date,
            created_at: now,
        })
    }
}

/// The body of `PUT /api/transactions/{id}`.
///
/// Every field is optional. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    /// The new amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// The new description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The new category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The new type, either "expense" or "income".
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The new date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl UpdateTransactionRequest {
    /// Validate the fields that are present and turn them into a patch that
    /// refreshes the update time to `now`.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if a present field has an unusable value.
    pub fn into_patch(self, now: OffsetDateTime) -> Result<TransactionPatch, Error> {
        let amount = self
            .amount
            .as_ref()
            .map(AmountInput::to_amount)
            .transpose()?;

        let kind = self
            .kind
            .as_deref()
            .map(str::parse::<TransactionType>)
            .transpose()?;

        let date = match self.date {
            Some(date) if date.trim().is_empty() => {
                return Err(Error::InvalidField {
                    field: "date",
                    reason: "date cannot be empty".to_owned(),
                });
            }
            Some(date) => Some(date.trim().to_owned()),
            None => None,
        };

        Ok(TransactionPatch {
            amount,
            description: self.description.map(|d| normalize_description(Some(d))),
            category: self.category.map(|c| normalize_category(Some(c))),
            kind,
            date,
            updated_at: now,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn normalize_description(description: Option<String>) -> String {
    non_blank(description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned())
}

fn normalize_category(category: Option<String>) -> String {
    non_blank(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned())
}
