//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and pure calculations, independent of
//! HTTP and persistence concerns.

pub mod dashboard;
pub mod expense;
pub mod identity;
pub mod password;
pub mod user;

pub use dashboard::{summarize, CategoryFilter, CategoryTotal, DashboardSummary, DateRange};
pub use expense::{
    round_amount, CreatorSummary, Expense, ExpenseCategory, ExpenseChanges, ExpenseDetailResponse,
    ExpenseDetails, ExpenseDraft, ExpenseFilter, ExpenseResponse, NewExpense,
};
pub use identity::CurrentUser;
pub use password::Password;
pub use user::{normalize_email, NewUser, ProfileChanges, SignUp, User, UserResponse, UserRole};
