//! The client's budgeting session.
//!
//! A session starts in [Session::Setup] and moves to [Session::Active] once
//! the user has given their name and monthly budget. There is no way back.
//!
//! Transactions can be kept in the session only ([ActiveSession::record_local])
//! or written through to the API first ([ActiveSession::record_synced]).

use maud::{Markup, html};
use time::OffsetDateTime;

use crate::{
    budget::{
        allocation::{BudgetAllocation, ExpenseCategory},
        balance::{BalanceClass, calculate_balance},
        cache::{ClientTransaction, TransactionCache},
        chart::{LegendEntry, PieChart, PieSlice, legend, render_legend},
    },
    client::{ApiClient, ClientError},
    database_id::TransactionId,
    transaction::{
        AmountInput, CreateTransactionRequest, DEFAULT_DESCRIPTION, ListTransactionsQuery,
        TransactionType,
    },
};

/// The list limit used by [ActiveSession::refresh] to load the whole store.
pub const ALL_TRANSACTIONS: u32 = u32::MAX;

/// The errors that can occur while using a [Session].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs an active session but setup has not finished.
    #[error("the session has not been set up yet")]
    NotActive,

    /// Setup was attempted on a session that is already active.
    #[error("the session has already been set up")]
    AlreadyActive,

    /// The name was empty or only whitespace.
    #[error("a name is required")]
    InvalidName,

    /// The monthly budget was zero, negative or not a number.
    #[error("the monthly budget must be a positive number, got {0}")]
    InvalidBudget(f64),

    /// A transaction amount was zero, negative or not a number.
    #[error("the amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    /// The API call failed. The session was left unchanged.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// The state of the budgeting UI.
#[derive(Debug, Clone, Default)]
pub enum Session {
    /// Waiting for the user's name and monthly budget.
    #[default]
    Setup,
    /// Set up, transactions and allocations can be changed.
    Active(ActiveSession),
}

impl Session {
    /// Create a session waiting for setup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether setup has finished.
    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    /// Finish setup with the user's `name` and `monthly_budget`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [SessionError::AlreadyActive] if setup has already finished,
    /// - [SessionError::InvalidName] if `name` is blank,
    /// - or [SessionError::InvalidBudget] if `monthly_budget` is not a
    ///   positive number.
    ///
    /// The session stays in [Session::Setup] on error.
    pub fn setup(
        &mut self,
        name: &str,
        monthly_budget: f64,
    ) -> Result<&mut ActiveSession, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidName);
        }

        if !monthly_budget.is_finite() || monthly_budget <= 0.0 {
            return Err(SessionError::InvalidBudget(monthly_budget));
        }

        tracing::info!("Starting budget session for {name} with {monthly_budget}");
        *self = Session::Active(ActiveSession::new(name.to_owned(), monthly_budget));

        self.active_mut()
    }

    /// The active session.
    ///
    /// # Errors
    /// Returns [SessionError::NotActive] during setup.
    pub fn active(&self) -> Result<&ActiveSession, SessionError> {
        match self {
            Session::Active(session) => Ok(session),
            Session::Setup => Err(SessionError::NotActive),
        }
    }

    /// The active session, for changing it.
    ///
    /// # Errors
    /// Returns [SessionError::NotActive] during setup.
    pub fn active_mut(&mut self) -> Result<&mut ActiveSession, SessionError> {
        match self {
            Session::Active(session) => Ok(session),
            Session::Setup => Err(SessionError::NotActive),
        }
    }
}

/// A transaction the user has entered but that has not been recorded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// How much money, always positive. The direction comes from `kind`.
    pub amount: f64,
    /// Whether money was spent or earned.
    pub kind: TransactionType,
    /// Defaults to [TransactionDraft::default_category].
    pub category: Option<String>,
    /// Defaults to "No description".
    pub description: Option<String>,
    /// Defaults to today, as `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl TransactionDraft {
    /// A draft with every optional field left to its default.
    pub fn new(amount: f64, kind: TransactionType) -> Self {
        Self {
            amount,
            kind,
            category: None,
            description: None,
            date: None,
        }
    }

    /// The category preselected for `kind`: Food for expenses and Salary for
    /// income.
    pub fn default_category(kind: TransactionType) -> &'static str {
        match kind {
            TransactionType::Expense => ExpenseCategory::Food.name(),
            TransactionType::Income => "Salary",
        }
    }

    fn validated(self) -> Result<Self, SessionError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(SessionError::InvalidAmount(self.amount));
        }

        let category = self
            .category
            .map(|category| category.trim().to_owned())
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| Self::default_category(self.kind).to_owned());
        let description = self
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned());
        let date = self
            .date
            .map(|date| date.trim().to_owned())
            .filter(|date| !date.is_empty())
            .unwrap_or_else(today);

        Ok(Self {
            amount: self.amount,
            kind: self.kind,
            category: Some(category),
            description: Some(description),
            date: Some(date),
        })
    }
}

impl From<TransactionDraft> for CreateTransactionRequest {
    fn from(draft: TransactionDraft) -> Self {
        CreateTransactionRequest {
            amount: Some(AmountInput::from(draft.amount)),
            description: draft.description,
            category: draft.category,
            kind: Some(draft.kind.as_str().to_owned()),
            date: draft.date,
        }
    }
}

/// A session after setup.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    name: String,
    monthly_budget: f64,
    transactions: TransactionCache,
    allocation: BudgetAllocation,
    chart: PieChart,
    last_local_id: i128,
}

impl ActiveSession {
    fn new(name: String, monthly_budget: f64) -> Self {
        Self {
            name,
            monthly_budget,
            transactions: TransactionCache::new(),
            allocation: BudgetAllocation::default(),
            chart: PieChart::default(),
            last_local_id: 0,
        }
    }

    /// The user's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The budget for the month.
    pub fn monthly_budget(&self) -> f64 {
        self.monthly_budget
    }

    /// The transactions, most recent first.
    pub fn transactions(&self) -> &TransactionCache {
        &self.transactions
    }

    /// The split of the budget across categories.
    pub fn allocation(&self) -> &BudgetAllocation {
        &self.allocation
    }

    /// Record `draft` in this session only, with a timestamp as its ID.
    ///
    /// # Errors
    /// Returns [SessionError::InvalidAmount] if the amount is not positive.
    pub fn record_local(
        &mut self,
        draft: TransactionDraft,
    ) -> Result<&ClientTransaction, SessionError> {
        let draft = draft.validated()?;
        let id = self.next_local_id();

        Ok(self.transactions.add(ClientTransaction {
            id,
            amount: draft.kind.signed(draft.amount),
            description: draft.description.unwrap_or_default(),
            category: draft.category.unwrap_or_default(),
            kind: draft.kind,
            date: draft.date.unwrap_or_default(),
        }))
    }

    /// Remove the transaction `id` from this session only.
    ///
    /// Returns whether there was such a transaction.
    pub fn remove_local(&mut self, id: &str) -> bool {
        self.transactions.remove(id)
    }

    /// Store `draft` through the API, then add the stored record to the session.
    ///
    /// # Errors
    /// Returns [SessionError::InvalidAmount] if the amount is not positive, or
    /// [SessionError::Client] if the API call fails. The session is unchanged
    /// on error.
    pub async fn record_synced(
        &mut self,
        client: &ApiClient,
        draft: TransactionDraft,
    ) -> Result<&ClientTransaction, SessionError> {
        let request = CreateTransactionRequest::from(draft.validated()?);
        let transaction = client.create(&request).await?;

        Ok(self.transactions.add(transaction.into()))
    }

    /// Delete the transaction `id` through the API, then remove it from the
    /// session.
    ///
    /// # Errors
    /// Returns [SessionError::Client] if the API call fails, in which case the
    /// session is unchanged.
    pub async fn remove_synced(
        &mut self,
        client: &ApiClient,
        id: &TransactionId,
    ) -> Result<(), SessionError> {
        client.delete(id).await?;
        self.transactions.remove(id.as_str());

        Ok(())
    }

    /// Replace the session's transactions with every transaction stored by
    /// the API.
    ///
    /// The list is requested with [ALL_TRANSACTIONS] as the limit, so the
    /// server's default page size does not cut the balance short.
    ///
    /// Returns the number of transactions loaded.
    ///
    /// # Errors
    /// Returns [SessionError::Client] if the API call fails, in which case the
    /// session is unchanged.
    pub async fn refresh(&mut self, client: &ApiClient) -> Result<usize, SessionError> {
        let query = ListTransactionsQuery {
            limit: Some(ALL_TRANSACTIONS),
            ..Default::default()
        };
        let transactions = client.list(&query).await?;

        self.transactions
            .replace_all(transactions.into_iter().map(ClientTransaction::from).collect());

        Ok(self.transactions.len())
    }

    /// Assign `percentage` of the budget to `category`.
    ///
    /// Returns `false` and changes nothing if the allocation would go over 100%.
    pub fn set_allocation(&mut self, category: ExpenseCategory, percentage: u32) -> bool {
        self.allocation.set_allocation(category, percentage)
    }

    /// The monthly budget plus every transaction's signed amount.
    pub fn balance(&self) -> f64 {
        calculate_balance(
            self.monthly_budget,
            self.transactions.iter().map(|transaction| transaction.amount),
        )
    }

    /// Whether the balance is a surplus, a deficit or neither.
    pub fn balance_class(&self) -> BalanceClass {
        BalanceClass::of(self.balance())
    }

    /// The chart slices for the current allocation.
    pub fn pie_slices(&self) -> Vec<PieSlice> {
        self.chart.slices(&self.allocation, self.monthly_budget)
    }

    /// The legend rows for the current allocation.
    pub fn legend(&self) -> Vec<LegendEntry> {
        legend(&self.allocation, self.monthly_budget)
    }

    /// Render the allocation chart and its legend.
    pub fn render_chart(&self) -> Markup {
        html! {
            div class="budget-allocation" {
                (self.chart.render(&self.pie_slices()))
                (render_legend(&self.legend()))
            }
        }
    }

    fn next_local_id(&mut self) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp_nanos();
        self.last_local_id = now.max(self.last_local_id + 1);

        self.last_local_id.to_string()
    }
}

fn today() -> String {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .to_string()
}
