//! Unit of Work - centralized repository access.
//!
//! Every write in this service touches a single row, so no multi-statement
//! transactions are exposed; the store's per-row atomicity is sufficient.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{ExpenseRepository, ExpenseStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get expense repository
    fn expenses(&self) -> Arc<dyn ExpenseRepository>;
}

/// Concrete implementation of UnitOfWork over a pooled connection
pub struct Persistence {
    user_repo: Arc<UserStore>,
    expense_repo: Arc<ExpenseStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            expense_repo: Arc::new(ExpenseStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn expenses(&self) -> Arc<dyn ExpenseRepository> {
        self.expense_repo.clone()
    }
}

/// Unit of Work over explicitly supplied repositories.
///
/// Used to wire alternative stores, such as in-memory fakes.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
}

impl UnitOfWork for Repositories {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn expenses(&self) -> Arc<dyn ExpenseRepository> {
        self.expenses.clone()
    }
}
