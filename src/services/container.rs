//! Service Container - Centralized service access.
//!
//! Handlers depend on the service traits through this container, never on
//! concrete implementations.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ExpenseManager, ExpenseService, TokenIssuer, UserManager,
    UserService,
};
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get expense service
    fn expenses(&self) -> Arc<dyn ExpenseService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    expense_service: Arc<dyn ExpenseService>,
}

impl Services {
    /// Wire every service over one Unit of Work.
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            expense_service: Arc::new(ExpenseManager::new(uow)),
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection, tokens: Arc<TokenIssuer>) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), tokens)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn expenses(&self) -> Arc<dyn ExpenseService> {
        self.expense_service.clone()
    }
}
