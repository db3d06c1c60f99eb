//! Expense Tracker API
//!
//! A shared expense ledger: users sign up and sign in for a bearer token,
//! admins record and edit expenses, and everyone authenticated can browse
//! the ledger and its dashboard summary.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Persistence (SeaORM entities, repositories, migrations)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared request/response helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Insert sample expenses owned by an existing user
//! cargo run -- seed --email owner@example.com
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Expense, ExpenseCategory, Password, User, UserRole};
pub use errors::{AppError, AppResult};
