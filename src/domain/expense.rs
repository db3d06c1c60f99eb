//! Expense domain entity, categories and monetary helpers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::{User, UserRole};
use crate::config::{AMOUNT_SCALE, MAX_EXPENSE_AMOUNT};
use crate::errors::{AppError, AppResult};

/// Fixed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ExpenseCategory {
    Rent,
    Electricity,
    Groceries,
    Maintenance,
    Salary,
    Miscellaneous,
}

impl ExpenseCategory {
    /// All categories in display order
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Electricity,
        ExpenseCategory::Groceries,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Salary,
        ExpenseCategory::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Electricity => "Electricity",
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::Maintenance => "Maintenance",
            ExpenseCategory::Salary => "Salary",
            ExpenseCategory::Miscellaneous => "Miscellaneous",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::validation("Invalid category"))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a validated amount to an exact decimal with two places.
///
/// Midpoints round away from zero, so 12.125 becomes 12.13.
pub fn round_amount(amount: f64) -> AppResult<Decimal> {
    if !amount.is_finite() {
        return Err(AppError::validation("Amount must be a valid number"));
    }
    if amount > MAX_EXPENSE_AMOUNT {
        return Err(AppError::validation("Amount is too large"));
    }
    let value = Decimal::from_f64(amount)
        .ok_or_else(|| AppError::validation("Amount must be a valid number"))?;
    Ok(value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Expense domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    /// Weak reference to the creating user
    pub created_by: Option<Uuid>,
    pub title: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    pub branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully normalized input for a new expense record
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub created_by: Option<Uuid>,
    pub title: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    pub branch: String,
}

/// Validated create input; defaults are applied by the expense service.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub branch: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub title: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub branch: Option<String>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.branch.is_none()
    }

    /// Apply the changes to an in-memory record.
    pub fn apply_to(self, expense: &mut Expense) {
        if let Some(title) = self.title {
            expense.title = title;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(branch) = self.branch {
            expense.branch = branch;
        }
    }
}

/// Query constraints for listing expenses. Ranges are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub branch: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.map_or(true, |c| expense.category == c)
            && self.start_date.map_or(true, |d| expense.date >= d)
            && self.end_date.map_or(true, |d| expense.date <= d)
            && self.branch.as_ref().map_or(true, |b| &expense.branch == b)
            && self.min_amount.map_or(true, |m| expense.amount >= m)
            && self.max_amount.map_or(true, |m| expense.amount <= m)
    }
}

/// Public projection of the creating user
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for CreatorSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// An expense together with its resolved creator
#[derive(Debug, Clone)]
pub struct ExpenseDetails {
    pub expense: Expense,
    pub creator: Option<CreatorSummary>,
}

/// Expense response (amount serialized as a JSON number)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    #[schema(example = "October Rent")]
    pub title: String,
    pub category: ExpenseCategory,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15000.0)]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    #[schema(example = "Main")]
    pub branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            created_by: expense.created_by,
            title: expense.title,
            category: expense.category,
            amount: expense.amount,
            date: expense.date,
            description: expense.description,
            branch: expense.branch,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

/// Single-expense response with the creator populated
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpenseDetailResponse {
    #[serde(flatten)]
    pub expense: ExpenseResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<CreatorSummary>,
}

impl From<ExpenseDetails> for ExpenseDetailResponse {
    fn from(details: ExpenseDetails) -> Self {
        Self {
            expense: ExpenseResponse::from(details.expense),
            creator: details.creator,
        }
    }
}
