//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories over SeaORM entities
//! - Unit of Work for repository access

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{ExpenseRepository, ExpenseStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, Repositories, UnitOfWork};
