//! API middleware.

mod auth;

pub use auth::{auth_middleware, role_gate, AllowedRoles, CurrentUser};
