//! HTTP request handlers.

pub mod auth_handler;
pub mod expense_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use expense_handler::expense_routes;
pub use user_handler::user_routes;
