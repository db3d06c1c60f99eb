//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, expense_handler, user_handler};
use crate::domain::{
    CategoryTotal, CreatorSummary, DashboardSummary, DateRange, ExpenseCategory,
    ExpenseDetailResponse, ExpenseResponse, UserResponse, UserRole,
};
use crate::types::MessageResponse;

/// OpenAPI documentation for the Expense Tracker API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expense Tracker API",
        version = "0.1.0",
        description = "Shared expense ledger with role-based access for admins and staff",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signup,
        auth_handler::signin,
        // User endpoints
        user_handler::get_current_user,
        user_handler::update_current_user,
        user_handler::change_password,
        user_handler::update_status,
        // Expense endpoints
        expense_handler::list_expenses,
        expense_handler::expense_summary,
        expense_handler::create_expense,
        expense_handler::get_expense,
        expense_handler::update_expense,
        expense_handler::delete_expense,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            ExpenseCategory,
            ExpenseResponse,
            ExpenseDetailResponse,
            CreatorSummary,
            DateRange,
            CategoryTotal,
            DashboardSummary,
            MessageResponse,
            // Auth types
            auth_handler::SignUpRequest,
            auth_handler::SignInRequest,
            auth_handler::AuthResponse,
            // User handler types
            user_handler::UpdateProfileRequest,
            user_handler::ChangePasswordRequest,
            user_handler::UpdateStatusRequest,
            user_handler::UserEnvelope,
            // Expense handler types
            expense_handler::CreateExpenseRequest,
            expense_handler::UpdateExpenseRequest,
            expense_handler::ExpenseListResponse,
            expense_handler::ExpenseCreatedResponse,
            expense_handler::ExpenseDetailEnvelope,
            expense_handler::ExpenseUpdatedResponse,
            expense_handler::ExpenseDeletedResponse,
            expense_handler::SummaryResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User signup and signin"),
        (name = "Users", description = "Profile and account status"),
        (name = "Expenses", description = "Expense ledger and dashboard")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /users/signin"))
                        .build(),
                ),
            );
        }
    }
}
