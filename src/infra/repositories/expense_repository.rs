//! Expense repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::expense::{self, ActiveModel, Entity as ExpenseEntity};
use crate::domain::{Expense, ExpenseChanges, ExpenseFilter, NewExpense};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Expense repository trait for dependency injection.
///
/// Inputs are expected to be validated and normalized by the service layer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// List expenses matching the filter, newest `date` first
    async fn list(&self, filter: ExpenseFilter) -> AppResult<Vec<Expense>>;

    /// Find expense by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Expense>>;

    /// Insert a new expense
    async fn create(&self, expense: NewExpense) -> AppResult<Expense>;

    /// Insert several expenses, returning how many were written
    async fn create_many(&self, expenses: Vec<NewExpense>) -> AppResult<u64>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, changes: ExpenseChanges) -> AppResult<Expense>;

    /// Delete by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Count all expenses
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed implementation of ExpenseRepository
pub struct ExpenseStore {
    db: DatabaseConnection,
}

impl ExpenseStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(expense: NewExpense) -> ActiveModel {
    let now = chrono::Utc::now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        created_by: Set(expense.created_by),
        title: Set(expense.title),
        category: Set(expense.category.to_string()),
        amount: Set(expense.amount),
        date: Set(expense.date),
        description: Set(expense.description),
        branch: Set(expense.branch),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn filter_condition(filter: &ExpenseFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(category) = filter.category {
        condition = condition.add(expense::Column::Category.eq(category.to_string()));
    }
    if let Some(start) = filter.start_date {
        condition = condition.add(expense::Column::Date.gte(start));
    }
    if let Some(end) = filter.end_date {
        condition = condition.add(expense::Column::Date.lte(end));
    }
    if let Some(branch) = &filter.branch {
        condition = condition.add(expense::Column::Branch.eq(branch.as_str()));
    }
    if let Some(min) = filter.min_amount {
        condition = condition.add(expense::Column::Amount.gte(min));
    }
    if let Some(max) = filter.max_amount {
        condition = condition.add(expense::Column::Amount.lte(max));
    }

    condition
}

#[async_trait]
impl ExpenseRepository for ExpenseStore {
    async fn list(&self, filter: ExpenseFilter) -> AppResult<Vec<Expense>> {
        let models = ExpenseEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(expense::Column::Date)
            .all(&self.db)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Expense>> {
        ExpenseEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Expense::try_from)
            .transpose()
    }

    async fn create(&self, expense: NewExpense) -> AppResult<Expense> {
        let model = to_active_model(expense).insert(&self.db).await?;
        Expense::try_from(model)
    }

    async fn create_many(&self, expenses: Vec<NewExpense>) -> AppResult<u64> {
        if expenses.is_empty() {
            return Ok(0);
        }

        let count = expenses.len() as u64;
        ExpenseEntity::insert_many(expenses.into_iter().map(to_active_model))
            .exec(&self.db)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: Uuid, changes: ExpenseChanges) -> AppResult<Expense> {
        let model = ExpenseEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Expense"))?;

        let mut active: ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(category) = changes.category {
            active.category = Set(category.to_string());
        }
        if let Some(amount) = changes.amount {
            active.amount = Set(amount);
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(branch) = changes.branch {
            active.branch = Set(branch);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Expense::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ExpenseEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Expense"));
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        ExpenseEntity::find()
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
