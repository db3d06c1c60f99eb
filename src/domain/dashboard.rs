//! Dashboard aggregation over an expense list.
//!
//! Pure functions: callers supply the clock so results are reproducible.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::expense::{Expense, ExpenseCategory};

/// Category selector; `All` disables category filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ExpenseCategory),
}

impl From<Option<ExpenseCategory>> for CategoryFilter {
    fn from(category: Option<ExpenseCategory>) -> Self {
        category.map_or(CategoryFilter::All, CategoryFilter::Only)
    }
}

/// Calendar window relative to "now", evaluated in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    CurrentMonth,
    LastThreeMonths,
    AllTime,
}

impl DateRange {
    /// Whether `date` falls inside the window ending at `now`.
    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateRange::CurrentMonth => date.year() == now.year() && date.month() == now.month(),
            DateRange::LastThreeMonths => date >= month_start(now, 2) && date <= now,
            DateRange::AllTime => true,
        }
    }
}

/// Midnight on the first day of the month `months_back` months before `now`.
fn month_start(now: DateTime<Utc>, months_back: u32) -> DateTime<Utc> {
    let total = now.year() * 12 + now.month0() as i32 - months_back as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub range: DateRange,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: usize,
    /// Per-category sums in fixed category order, zero sums omitted
    pub by_category: Vec<CategoryTotal>,
    /// Highest-spend categories, descending
    pub top: Vec<CategoryTotal>,
}

/// Summarize expenses for the dashboard.
pub fn summarize(
    expenses: &[Expense],
    category: CategoryFilter,
    range: DateRange,
    now: DateTime<Utc>,
    top_n: usize,
) -> DashboardSummary {
    let selected: Vec<&Expense> = expenses
        .iter()
        .filter(|e| match category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => e.category == c,
        })
        .filter(|e| range.contains(e.date, now))
        .collect();

    let total: Decimal = selected.iter().map(|e| e.amount).sum();

    let by_category: Vec<CategoryTotal> = ExpenseCategory::ALL
        .into_iter()
        .map(|c| CategoryTotal {
            category: c,
            amount: selected
                .iter()
                .filter(|e| e.category == c)
                .map(|e| e.amount)
                .sum(),
        })
        .filter(|t| t.amount > Decimal::ZERO)
        .collect();

    // Stable sort keeps category order for ties
    let mut top = by_category.clone();
    top.sort_by(|a, b| b.amount.cmp(&a.amount));
    top.truncate(top_n);

    DashboardSummary {
        range,
        total,
        count: selected.len(),
        by_category,
        top,
    }
}
