//! Expense service - CRUD, dashboard summary and sample seeding.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DEFAULT_BRANCH;
use crate::domain::{
    summarize, CategoryFilter, CurrentUser, DashboardSummary, DateRange, Expense, ExpenseCategory,
    ExpenseChanges, ExpenseDetails, ExpenseDraft, ExpenseFilter, NewExpense,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Expense service trait for dependency injection.
#[async_trait]
pub trait ExpenseService: Send + Sync {
    /// List expenses matching the filter, newest first
    async fn list(&self, filter: ExpenseFilter) -> AppResult<Vec<Expense>>;

    /// Get one expense with its creator resolved
    async fn get(&self, id: Uuid) -> AppResult<ExpenseDetails>;

    /// Record a new expense on behalf of the actor
    async fn create(&self, actor: &CurrentUser, draft: ExpenseDraft) -> AppResult<Expense>;

    /// Apply a partial update
    async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        changes: ExpenseChanges,
    ) -> AppResult<Expense>;

    /// Delete an expense, returning its id
    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Uuid>;

    /// Aggregate totals for the dashboard
    async fn summary(
        &self,
        category: CategoryFilter,
        range: DateRange,
        top: usize,
    ) -> AppResult<DashboardSummary>;

    /// Insert the sample data set when no expenses exist yet.
    /// Returns the number of rows written.
    async fn seed_samples(&self, created_by: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of ExpenseService using Unit of Work.
pub struct ExpenseManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ExpenseManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Rounding may push a tiny positive amount down to zero.
fn ensure_positive(amount: Decimal) -> AppResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation("Amount must be greater than 0"));
    }
    Ok(amount)
}

/// October 2025 sample ledger for the Main branch.
pub fn sample_expenses(created_by: Uuid) -> Vec<NewExpense> {
    let rows: [(&str, ExpenseCategory, i64, u32, &str); 6] = [
        ("October Rent", ExpenseCategory::Rent, 15000, 1, "Monthly PG rent"),
        ("Monthly Maintenance", ExpenseCategory::Maintenance, 2000, 3, "General maintenance and repairs"),
        ("Electricity Bill", ExpenseCategory::Electricity, 3000, 5, "Electricity charges for the month"),
        ("Groceries", ExpenseCategory::Groceries, 1500, 7, "Groceries for common kitchen"),
        ("Staff Salary", ExpenseCategory::Salary, 3500, 10, "Salaries for PG staff"),
        ("Miscellaneous Expenses", ExpenseCategory::Miscellaneous, 500, 12, "Other minor expenses"),
    ];

    rows.into_iter()
        .map(|(title, category, amount, day, description)| NewExpense {
            created_by: Some(created_by),
            title: title.to_string(),
            category,
            amount: Decimal::new(amount, 0),
            date: Utc
                .with_ymd_and_hms(2025, 10, day, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            description: description.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        })
        .collect()
}

#[async_trait]
impl<U: UnitOfWork> ExpenseService for ExpenseManager<U> {
    async fn list(&self, filter: ExpenseFilter) -> AppResult<Vec<Expense>> {
        self.uow.expenses().list(filter).await
    }

    async fn get(&self, id: Uuid) -> AppResult<ExpenseDetails> {
        let expense = self
            .uow
            .expenses()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Expense")?;

        // The creator is a weak reference and may no longer exist
        let creator = match expense.created_by {
            Some(user_id) => self.uow.users().find_by_id(user_id).await?.map(Into::into),
            None => None,
        };

        Ok(ExpenseDetails { expense, creator })
    }

    async fn create(&self, actor: &CurrentUser, draft: ExpenseDraft) -> AppResult<Expense> {
        let new_expense = NewExpense {
            created_by: Some(actor.id),
            title: draft.title,
            category: draft.category,
            amount: ensure_positive(draft.amount)?,
            date: draft.date.unwrap_or_else(Utc::now),
            description: draft.description.unwrap_or_default(),
            branch: draft
                .branch
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        };

        let expense = self.uow.expenses().create(new_expense).await?;
        tracing::info!(
            expense_id = %expense.id,
            user_id = %actor.id,
            category = %expense.category,
            amount = %expense.amount,
            "Expense created"
        );
        Ok(expense)
    }

    async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        mut changes: ExpenseChanges,
    ) -> AppResult<Expense> {
        if changes.is_empty() {
            return Err(AppError::validation(
                "At least one field must be provided for update",
            ));
        }
        if let Some(amount) = changes.amount {
            changes.amount = Some(ensure_positive(amount)?);
        }
        if changes.branch.as_deref() == Some("") {
            changes.branch = Some(DEFAULT_BRANCH.to_string());
        }

        let expense = self.uow.expenses().update(id, changes).await?;
        tracing::info!(expense_id = %id, user_id = %actor.id, "Expense updated");
        Ok(expense)
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Uuid> {
        let expenses = self.uow.expenses();
        expenses.find_by_id(id).await?.ok_or_not_found("Expense")?;
        expenses.delete(id).await?;

        tracing::info!(expense_id = %id, user_id = %actor.id, "Expense deleted");
        Ok(id)
    }

    async fn summary(
        &self,
        category: CategoryFilter,
        range: DateRange,
        top: usize,
    ) -> AppResult<DashboardSummary> {
        let filter = ExpenseFilter {
            category: match category {
                CategoryFilter::All => None,
                CategoryFilter::Only(c) => Some(c),
            },
            ..Default::default()
        };
        let expenses = self.uow.expenses().list(filter).await?;

        Ok(summarize(&expenses, category, range, Utc::now(), top))
    }

    async fn seed_samples(&self, created_by: Uuid) -> AppResult<u64> {
        let expenses = self.uow.expenses();
        let existing = expenses.count().await?;
        if existing > 0 {
            tracing::info!(existing, "Expenses already present, skipping seed");
            return Ok(0);
        }

        let inserted = expenses.create_many(sample_expenses(created_by)).await?;
        tracing::info!(inserted, "Sample expenses seeded");
        Ok(inserted)
    }
}
