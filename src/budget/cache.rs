//! The transactions held by the client for the current session.

use crate::transaction::{Transaction, TransactionType};

/// A transaction as the client sees it: the amount carries the direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientTransaction {
    /// The server assigned ID, or a timestamp for session-only transactions.
    pub id: String,
    /// Negative for expenses, positive for income.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// The spending or income category.
    pub category: String,
    /// Whether this is an expense or income.
    pub kind: TransactionType,
    /// When the transaction happened.
    pub date: String,
}

impl From<Transaction> for ClientTransaction {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id.to_string(),
            amount: transaction.kind.signed(transaction.amount),
            description: transaction.description,
            category: transaction.category,
            kind: transaction.kind,
            date: transaction.date,
        }
    }
}

/// An in-memory list of transactions, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionCache {
    transactions: Vec<ClientTransaction>,
}

impl TransactionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `transaction` at the front of the list and return it.
    pub fn add(&mut self, transaction: ClientTransaction) -> &ClientTransaction {
        self.transactions.insert(0, transaction);

        &self.transactions[0]
    }

    /// Remove the transaction with `id`, returning whether there was one.
    pub fn remove(&mut self, id: &str) -> bool {
        let count = self.transactions.len();
        self.transactions.retain(|transaction| transaction.id != id);

        self.transactions.len() != count
    }

    /// Replace the contents with `transactions`, which should already be most
    /// recent first.
    pub fn replace_all(&mut self, transactions: Vec<ClientTransaction>) {
        self.transactions = transactions;
    }

    /// The transactions, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &ClientTransaction> {
        self.transactions.iter()
    }

    /// The `count` most recent transactions.
    pub fn recent(&self, count: usize) -> &[ClientTransaction] {
        &self.transactions[..count.min(self.transactions.len())]
    }

    /// The number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether there are no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{Transaction, TransactionId, TransactionType};

    use super::{ClientTransaction, TransactionCache};

    fn client_transaction(id: &str, amount: f64) -> ClientTransaction {
        ClientTransaction {
            id: id.to_owned(),
            amount,
            description: "Test".to_owned(),
            category: "Other".to_owned(),
            kind: if amount < 0.0 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            },
            date: "2025-10-17".to_owned(),
        }
    }

    #[test]
    fn add_prepends() {
        let mut cache = TransactionCache::new();

        cache.add(client_transaction("1", -5.0));
        cache.add(client_transaction("2", 10.0));

        let ids: Vec<_> = cache.iter().map(|transaction| transaction.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn remove_reports_whether_anything_was_removed() {
        let mut cache = TransactionCache::new();
        cache.add(client_transaction("1", -5.0));

        assert!(cache.remove("1"));
        assert!(!cache.remove("1"));
        assert!(cache.is_empty());
    }

    #[test]
    fn recent_is_bounded_by_length() {
        let mut cache = TransactionCache::new();
        for id in ["1", "2", "3"] {
            cache.add(client_transaction(id, 1.0));
        }

        assert_eq!(cache.recent(2).len(), 2);
        assert_eq!(cache.recent(2)[0].id, "3");
        assert_eq!(cache.recent(5).len(), 3);
    }

    #[test]
    fn server_expense_becomes_negative() {
        let transaction = Transaction {
            id: TransactionId::from("abc"),
            amount: 50.0,
            description: "Groceries".to_owned(),
            category: "Food".to_owned(),
            kind: TransactionType::Expense,
            date: "2025-10-17".to_owned(),
            created_at: datetime!(2025-10-17 09:30:00 UTC),
            updated_at: datetime!(2025-10-17 09:30:00 UTC),
        };

        let client = ClientTransaction::from(transaction);

        assert_eq!(client.id, "abc");
        assert_eq!(client.amount, -50.0);
    }
}
