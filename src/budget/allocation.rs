//! The split of the monthly budget across spending categories.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The highest total percentage an allocation may reach.
pub const MAX_TOTAL_PERCENTAGE: u32 = 100;

/// The categories offered for income, in display order.
pub const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Freelance", "Investment", "Gift", "Other"];

/// A category that money can be budgeted for and spent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Groceries and eating out.
    Food,
    /// Getting around.
    Transport,
    /// Going out, subscriptions and hobbies.
    Entertainment,
    /// Everything bought in a shop.
    Shopping,
    /// Rent, power and other regular payments.
    Bills,
    /// Whatever does not fit elsewhere.
    Other,
}

impl ExpenseCategory {
    /// Every category in the order it is drawn in the chart.
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::Bills,
        ExpenseCategory::Other,
    ];

    /// The display name, also used as the transaction category.
    pub fn name(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Bills => "Bills",
            ExpenseCategory::Other => "Other",
        }
    }

    /// The fill colour of the category's slice, as a CSS hex colour.
    pub fn color(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "#ef4444",
            ExpenseCategory::Transport => "#3b82f6",
            ExpenseCategory::Entertainment => "#10b981",
            ExpenseCategory::Shopping => "#f59e0b",
            ExpenseCategory::Bills => "#8b5cf6",
            ExpenseCategory::Other => "#6b7280",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The error returned when a string does not name an [ExpenseCategory].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not an expense category")]
pub struct UnknownCategory(pub String);

impl FromStr for ExpenseCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// The percentage of the monthly budget assigned to each expense category.
///
/// The percentages never add up to more than [MAX_TOTAL_PERCENTAGE]. Changes
/// that would break this are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAllocation {
    percentages: [u32; ExpenseCategory::ALL.len()],
}

impl Default for BudgetAllocation {
    /// Food 25%, Transport 15%, Entertainment 10%, Shopping 20%, Bills 25%
    /// and Other 5%.
    fn default() -> Self {
        Self {
            percentages: [25, 15, 10, 20, 25, 5],
        }
    }
}

impl BudgetAllocation {
    /// An allocation with nothing assigned to any category.
    pub fn empty() -> Self {
        Self {
            percentages: [0; ExpenseCategory::ALL.len()],
        }
    }

    /// The percentage assigned to `category`.
    pub fn get(&self, category: ExpenseCategory) -> u32 {
        self.percentages[category.index()]
    }

    /// The sum of all percentages.
    pub fn total(&self) -> u32 {
        self.percentages.iter().sum()
    }

    /// Whether assigning `percentage` to `category` would push the total over
    /// [MAX_TOTAL_PERCENTAGE].
    pub fn would_exceed_total(&self, category: ExpenseCategory, percentage: u32) -> bool {
        let others = self.total() - self.get(category);

        others.saturating_add(percentage) > MAX_TOTAL_PERCENTAGE
    }

    /// The largest percentage that can be assigned to `category` without
    /// exceeding [MAX_TOTAL_PERCENTAGE].
    pub fn max_for(&self, category: ExpenseCategory) -> u32 {
        MAX_TOTAL_PERCENTAGE - (self.total() - self.get(category))
    }

    /// Assign `percentage` to `category`.
    ///
    /// Returns `false` and leaves the allocation unchanged if the new total
    /// would exceed [MAX_TOTAL_PERCENTAGE].
    pub fn set_allocation(&mut self, category: ExpenseCategory, percentage: u32) -> bool {
        if self.would_exceed_total(category, percentage) {
            tracing::debug!(
                "Ignoring allocation of {percentage}% to {category}, at most {}% is available",
                self.max_for(category)
            );
            return false;
        }

        self.percentages[category.index()] = percentage;
        true
    }

    /// The categories and their percentages in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, u32)> + '_ {
        ExpenseCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }
}

#[cfg(test)]
mod tests {
    use super::{BudgetAllocation, ExpenseCategory, MAX_TOTAL_PERCENTAGE, UnknownCategory};

    #[test]
    fn default_allocation_sums_to_one_hundred() {
        let allocation = BudgetAllocation::default();

        assert_eq!(allocation.total(), 100);
        assert_eq!(allocation.get(ExpenseCategory::Food), 25);
        assert_eq!(allocation.get(ExpenseCategory::Other), 5);
    }

    #[test]
    fn rejects_change_that_exceeds_total() {
        let mut allocation = BudgetAllocation::default();

        let applied = allocation.set_allocation(ExpenseCategory::Food, 30);

        assert!(!applied);
        assert_eq!(allocation, BudgetAllocation::default());
    }

    #[test]
    fn accepts_change_within_total() {
        let mut allocation = BudgetAllocation::default();

        assert!(allocation.set_allocation(ExpenseCategory::Food, 10));
        assert!(allocation.set_allocation(ExpenseCategory::Bills, 40));

        assert_eq!(allocation.get(ExpenseCategory::Food), 10);
        assert_eq!(allocation.get(ExpenseCategory::Bills), 40);
        assert_eq!(allocation.total(), 100);
    }

    #[test]
    fn max_for_is_what_the_other_categories_leave() {
        let mut allocation = BudgetAllocation::default();
        allocation.set_allocation(ExpenseCategory::Shopping, 0);

        assert_eq!(allocation.max_for(ExpenseCategory::Shopping), 20);
        assert_eq!(allocation.max_for(ExpenseCategory::Food), 45);
        assert!(!allocation.would_exceed_total(ExpenseCategory::Food, 45));
        assert!(allocation.would_exceed_total(ExpenseCategory::Food, 46));
    }

    #[test]
    fn total_never_exceeds_one_hundred() {
        let mut allocation = BudgetAllocation::empty();
        // A deterministic but jumbled sequence of requests, some too large.
        let mut seed = 17_u32;

        for step in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let category = ExpenseCategory::ALL[(seed >> 8) as usize % ExpenseCategory::ALL.len()];
            let percentage = (seed >> 16) % 120;

            let applied = allocation.set_allocation(category, percentage);

            assert!(
                allocation.total() <= MAX_TOTAL_PERCENTAGE,
                "step {step}: total {} after setting {category} to {percentage}",
                allocation.total()
            );
            assert_eq!(applied, allocation.get(category) == percentage);
        }
    }

    #[test]
    fn parses_category_names() {
        assert_eq!("food".parse(), Ok(ExpenseCategory::Food));
        assert_eq!(" Bills ".parse(), Ok(ExpenseCategory::Bills));
        assert_eq!(
            "Rent".parse::<ExpenseCategory>(),
            Err(UnknownCategory("Rent".to_owned()))
        );
    }

    #[test]
    fn iterates_in_chart_order() {
        let names: Vec<_> = BudgetAllocation::default()
            .iter()
            .map(|(category, _)| category.name())
            .collect();

        assert_eq!(
            names,
            ["Food", "Transport", "Entertainment", "Shopping", "Bills", "Other"]
        );
    }
}
