//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod expense_repository;
mod user_repository;

pub use expense_repository::{ExpenseRepository, ExpenseStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
