//! The money left over from the monthly budget.

/// The monthly budget plus the signed sum of `amounts`.
///
/// Expenses are expected to be negative and income positive.
pub fn calculate_balance(monthly_budget: f64, amounts: impl IntoIterator<Item = f64>) -> f64 {
    monthly_budget + amounts.into_iter().sum::<f64>()
}

/// How the balance should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceClass {
    /// Money left over.
    Surplus,
    /// Overspent.
    Deficit,
    /// Exactly on budget.
    Neutral,
}

impl BalanceClass {
    /// Classify `balance` by its sign.
    pub fn of(balance: f64) -> Self {
        if balance > 0.0 {
            BalanceClass::Surplus
        } else if balance < 0.0 {
            BalanceClass::Deficit
        } else {
            BalanceClass::Neutral
        }
    }

    /// The CSS class used to style the balance.
    pub fn css_class(&self) -> &'static str {
        match self {
            BalanceClass::Surplus => "positive",
            BalanceClass::Deficit => "negative",
            BalanceClass::Neutral => "zero",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BalanceClass, calculate_balance};

    #[test]
    fn adds_signed_amounts_to_budget() {
        assert_eq!(calculate_balance(1000.0, [-50.0, 200.0]), 1150.0);
    }

    #[test]
    fn balance_without_transactions_is_budget() {
        assert_eq!(calculate_balance(500.0, []), 500.0);
    }

    #[test]
    fn classifies_by_sign() {
        assert_eq!(BalanceClass::of(0.01), BalanceClass::Surplus);
        assert_eq!(BalanceClass::of(-3.0), BalanceClass::Deficit);
        assert_eq!(BalanceClass::of(0.0), BalanceClass::Neutral);
        assert_eq!(BalanceClass::of(-3.0).css_class(), "negative");
    }
}
