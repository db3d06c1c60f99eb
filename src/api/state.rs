//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, ExpenseService, ServiceContainer, Services, TokenIssuer, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Expense service
    pub expense_service: Arc<dyn ExpenseService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state backed by the database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let tokens = Arc::new(TokenIssuer::from_config(config));
        let container = Services::from_connection(database.get_connection(), tokens);
        Self::from_services(&container, database)
    }

    /// Create application state from any service container.
    pub fn from_services(services: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            expense_service: services.expenses(),
            database,
        }
    }
}
