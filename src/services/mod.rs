//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and receive the caller's identity explicitly.

mod auth_service;
pub mod container;
mod expense_service;
mod token_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, AuthSession, Authenticator};
pub use expense_service::{sample_expenses, ExpenseManager, ExpenseService};
pub use token_service::{Claims, TokenIssuer};
pub use user_service::{UserManager, UserService};
