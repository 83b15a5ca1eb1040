//! The client-side budget model.
//!
//! This module contains everything the budgeting UI computes locally:
//! - The session state machine and the transactions held for the session
//! - The split of the monthly budget across expense categories
//! - The running balance and the pie chart of the allocation

mod allocation;
mod balance;
mod cache;
mod chart;
mod session;

pub use allocation::{
    BudgetAllocation, ExpenseCategory, INCOME_CATEGORIES, MAX_TOTAL_PERCENTAGE, UnknownCategory,
};
pub use balance::{BalanceClass, calculate_balance};
pub use cache::{ClientTransaction, TransactionCache};
pub use chart::{LegendEntry, PieChart, PieSlice, Point, SliceShape, legend, render_legend};
pub use session::{ALL_TRANSACTIONS, ActiveSession, Session, SessionError, TransactionDraft};
