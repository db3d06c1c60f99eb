//! Shared fixtures for integration tests.
//!
//! In-memory repositories stand in for Postgres so the full router,
//! middleware and services can be exercised without a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use expense_tracker::api::{create_router, AppState};
use expense_tracker::domain::{
    Expense, ExpenseChanges, ExpenseFilter, NewExpense, NewUser, Password, ProfileChanges, User,
    UserRole,
};
use expense_tracker::errors::{AppError, AppResult};
use expense_tracker::infra::{Database, ExpenseRepository, Repositories, UserRepository};
use expense_tracker::services::{Services, TokenIssuer};

pub const SECRET: &[u8] = b"integration-test-secret-key-32-bytes!!";
pub const PASSWORD: &str = "secret1";

// =============================================================================
// In-memory repositories
// =============================================================================

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn insert(&self, user: User) {
        self.rows.lock().unwrap().insert(user.id, user);
    }

    fn modify<F: FnOnce(&mut User)>(&self, id: Uuid, f: F) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows.get_mut(&id).ok_or(AppError::NotFound("User"))?;
        f(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Email already registered. Please login instead."));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            role: new_user.role,
            organization: new_user.organization,
            phone: new_user.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        self.modify(id, |user| {
            if let Some(name) = changes.name {
                user.name = name;
            }
            if let Some(organization) = changes.organization {
                user.organization = Some(organization);
            }
            if let Some(phone) = changes.phone {
                user.phone = Some(phone).filter(|p| !p.is_empty());
            }
        })
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        self.modify(id, |user| user.password_hash = password_hash)
            .map(|_| ())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User> {
        self.modify(id, |user| user.is_active = is_active)
    }
}

#[derive(Default)]
pub struct InMemoryExpenses {
    rows: Mutex<HashMap<Uuid, Expense>>,
}

impl InMemoryExpenses {
    pub fn get(&self, id: Uuid) -> Option<Expense> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn store(&self, new_expense: NewExpense) -> Expense {
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            created_by: new_expense.created_by,
            title: new_expense.title,
            category: new_expense.category,
            amount: new_expense.amount,
            date: new_expense.date,
            description: new_expense.description,
            branch: new_expense.branch,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(expense.id, expense.clone());
        expense
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenses {
    async fn list(&self, filter: ExpenseFilter) -> AppResult<Vec<Expense>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Expense> = rows.values().filter(|e| filter.matches(e)).cloned().collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matched)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Expense>> {
        Ok(self.get(id))
    }

    async fn create(&self, expense: NewExpense) -> AppResult<Expense> {
        Ok(self.store(expense))
    }

    async fn create_many(&self, expenses: Vec<NewExpense>) -> AppResult<u64> {
        let count = expenses.len() as u64;
        for expense in expenses {
            self.store(expense);
        }
        Ok(count)
    }

    async fn update(&self, id: Uuid, changes: ExpenseChanges) -> AppResult<Expense> {
        let mut rows = self.rows.lock().unwrap();
        let expense = rows.get_mut(&id).ok_or(AppError::NotFound("Expense"))?;
        changes.apply_to(expense);
        expense.updated_at = Utc::now();
        Ok(expense.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound("Expense"))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.len() as u64)
    }
}

// =============================================================================
// Test application
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUsers>,
    pub expenses: Arc<InMemoryExpenses>,
    pub tokens: Arc<TokenIssuer>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let expenses = Arc::new(InMemoryExpenses::default());
        let tokens = Arc::new(TokenIssuer::new(SECRET, Duration::days(7)));

        let uow = Arc::new(Repositories {
            users: users.clone(),
            expenses: expenses.clone(),
        });
        let services = Services::from_unit_of_work(uow, tokens.clone());
        let database = Arc::new(Database::from_connection(
            sea_orm::DatabaseConnection::Disconnected,
        ));

        Self {
            router: create_router(AppState::from_services(&services, database)),
            users,
            expenses,
            tokens,
        }
    }

    /// Store a user directly, with `PASSWORD` as the password.
    pub fn seed_user(&self, email: &str, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: Password::new(PASSWORD).unwrap().into_string(),
            name: "Seeded".to_string(),
            role,
            organization: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.clone());
        user
    }

    pub fn token_for(&self, user: &User) -> String {
        self.tokens.issue(user).unwrap()
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, json)
    }
}
