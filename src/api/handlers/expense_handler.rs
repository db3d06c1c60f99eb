//! Expense handlers.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::middleware::{role_gate, AllowedRoles, CurrentUser};
use crate::api::AppState;
use crate::config::DEFAULT_TOP_CATEGORIES;
use crate::domain::{
    round_amount, CategoryFilter, DashboardSummary, DateRange, ExpenseCategory, ExpenseChanges,
    ExpenseDetailResponse, ExpenseDraft, ExpenseFilter, ExpenseResponse,
};
use crate::errors::{AppError, AppResult, FieldError};
use crate::types::{trim, Created};

fn validate_category(category: &str) -> Result<(), ValidationError> {
    category
        .parse::<ExpenseCategory>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("category").with_message("Invalid category".into()))
}

fn parse_category(category: Option<String>) -> AppResult<Option<ExpenseCategory>> {
    category.map(|c| c.parse()).transpose()
}

fn parse_expense_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid expense ID"))
}

/// New expense payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExpenseRequest {
    #[serde(deserialize_with = "trim::string")]
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    #[schema(example = "October Rent")]
    pub title: String,
    #[validate(custom(function = "validate_category"))]
    #[schema(example = "Rent")]
    pub category: String,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than 0"))]
    #[schema(example = 15000.0)]
    pub amount: f64,
    /// Defaults to the current time
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    /// Defaults to `Main`
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(length(max = 50, message = "Branch name must not exceed 50 characters"))]
    pub branch: Option<String>,
}

impl CreateExpenseRequest {
    fn into_draft(self) -> AppResult<ExpenseDraft> {
        Ok(ExpenseDraft {
            title: self.title,
            category: self.category.parse()?,
            amount: round_amount(self.amount)?,
            date: self.date,
            description: self.description,
            branch: self.branch,
        })
    }
}

/// Partial expense update; at least one field is required
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExpenseRequest {
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than 0"))]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(length(max = 50, message = "Branch name must not exceed 50 characters"))]
    pub branch: Option<String>,
}

impl UpdateExpenseRequest {
    fn into_changes(self) -> AppResult<ExpenseChanges> {
        Ok(ExpenseChanges {
            title: self.title,
            category: parse_category(self.category)?,
            amount: self.amount.map(round_amount).transpose()?,
            date: self.date,
            description: self.description,
            branch: self.branch,
        })
    }
}

/// Query-string filter for listing expenses
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenseFilterQuery {
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub branch: Option<String>,
    #[validate(range(min = 0.0, message = "Minimum amount must not be negative"))]
    pub min_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "Maximum amount must not be negative"))]
    pub max_amount: Option<f64>,
}

impl ExpenseFilterQuery {
    fn into_filter(self) -> AppResult<ExpenseFilter> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::InvalidFields(vec![FieldError {
                    field: "startDate".to_string(),
                    message: "Start date must be before end date".to_string(),
                }]));
            }
        }

        let min_amount = self.min_amount.map(round_amount).transpose()?;
        let max_amount = self.max_amount.map(round_amount).transpose()?;
        if let (Some(min), Some(max)) = (min_amount, max_amount) {
            if min > max {
                return Err(AppError::InvalidFields(vec![FieldError {
                    field: "minAmount".to_string(),
                    message: "Minimum amount must not exceed maximum amount".to_string(),
                }]));
            }
        }

        Ok(ExpenseFilter {
            category: parse_category(self.category)?,
            start_date: self.start_date,
            end_date: self.end_date,
            branch: self.branch.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()),
            min_amount,
            max_amount,
        })
    }
}

/// Dashboard summary query
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// A category name, or omit for all categories
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
    /// `current_month` (default), `last_three_months` or `all_time`
    #[serde(default)]
    pub range: DateRange,
    /// Number of top categories to return
    #[validate(range(min = 1, max = 6, message = "Top must be between 1 and 6"))]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseListResponse {
    pub success: bool,
    pub expenses: Vec<ExpenseResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseCreatedResponse {
    pub success: bool,
    pub message: String,
    pub data: ExpenseResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseDetailEnvelope {
    pub success: bool,
    pub expense: ExpenseDetailResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub expense: ExpenseResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDeletedResponse {
    pub success: bool,
    pub message: String,
    pub expense_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: DashboardSummary,
}

/// Create expense routes; the caller wraps them in `auth_middleware`.
pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(list_expenses))
        .route("/summary", get(expense_summary))
        .route(
            "/create",
            post(create_expense)
                .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, role_gate)),
        )
        .route(
            "/edit/:id",
            get(get_expense).merge(
                put(update_expense)
                    .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, role_gate)),
            ),
        )
        .route("/delete/:id", delete(delete_expense))
}

/// List expenses, newest first
#[utoipa::path(
    get,
    path = "/expenses/all",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(ExpenseFilterQuery),
    responses(
        (status = 200, description = "Matching expenses", body = ExpenseListResponse),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_expenses(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ExpenseFilterQuery>,
) -> AppResult<Json<ExpenseListResponse>> {
    let expenses = state.expense_service.list(query.into_filter()?).await?;

    Ok(Json(ExpenseListResponse {
        success: true,
        expenses: expenses.into_iter().map(ExpenseResponse::from).collect(),
    }))
}

/// Dashboard totals by category
#[utoipa::path(
    get,
    path = "/expenses/summary",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(SummaryQuery),
    responses(
        (status = 200, description = "Dashboard summary", body = SummaryResponse),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn expense_summary(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SummaryQuery>,
) -> AppResult<Json<SummaryResponse>> {
    let category = CategoryFilter::from(parse_category(query.category)?);
    let top = query.top.unwrap_or(DEFAULT_TOP_CATEGORIES);

    let summary = state
        .expense_service
        .summary(category, query.range, top)
        .await?;

    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}

/// Record a new expense (admin only)
#[utoipa::path(
    post,
    path = "/expenses/create",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense added", body = ExpenseCreatedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateExpenseRequest>,
) -> AppResult<Created<ExpenseCreatedResponse>> {
    let expense = state
        .expense_service
        .create(&current_user, payload.into_draft()?)
        .await?;

    Ok(Created(ExpenseCreatedResponse {
        success: true,
        message: "Expense added successfully".to_string(),
        data: ExpenseResponse::from(expense),
    }))
}

/// Get one expense with its creator
#[utoipa::path(
    get,
    path = "/expenses/edit/{id}",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense", body = ExpenseDetailEnvelope),
        (status = 400, description = "Invalid expense ID"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ExpenseDetailEnvelope>> {
    let details = state.expense_service.get(parse_expense_id(&id)?).await?;

    Ok(Json(ExpenseDetailEnvelope {
        success: true,
        expense: ExpenseDetailResponse::from(details),
    }))
}

/// Update an expense (admin only)
#[utoipa::path(
    put,
    path = "/expenses/edit/{id}",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseUpdatedResponse),
        (status = 400, description = "Validation error or invalid expense ID"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn update_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateExpenseRequest>,
) -> AppResult<Json<ExpenseUpdatedResponse>> {
    let id = parse_expense_id(&id)?;
    let expense = state
        .expense_service
        .update(&current_user, id, payload.into_changes()?)
        .await?;

    Ok(Json(ExpenseUpdatedResponse {
        success: true,
        message: "Expense updated successfully".to_string(),
        expense: ExpenseResponse::from(expense),
    }))
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/expenses/delete/{id}",
    tag = "Expenses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense deleted", body = ExpenseDeletedResponse),
        (status = 400, description = "Invalid expense ID"),
        (status = 404, description = "Expense not found")
    )
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ExpenseDeletedResponse>> {
    let expense_id = state
        .expense_service
        .delete(&current_user, parse_expense_id(&id)?)
        .await?;

    Ok(Json(ExpenseDeletedResponse {
        success: true,
        message: "Expense deleted successfully".to_string(),
        expense_id,
    }))
}
