//! Profile and account status handlers.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, patch, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::auth_handler::PHONE_REGEX;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{role_gate, AllowedRoles, CurrentUser};
use crate::api::AppState;
use crate::domain::{ProfileChanges, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::types::{trim, MessageResponse};

/// Partial profile update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name must be between 1 and 50 characters long"
    ))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trim::option")]
    pub organization: Option<String>,
    /// Empty string clears the phone number
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(regex(path = *PHONE_REGEX, message = "Please provide a valid 10-digit phone number"))]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            organization: req.organization,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(
        min = 6,
        max = 100,
        message = "Password must be between 6 and 100 characters long"
    ))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserResponse,
}

/// Create user routes; the caller wraps them in `auth_middleware`.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user).put(update_current_user))
        .route("/me/password", put(change_password))
        .route(
            "/:id/status",
            patch(update_status)
                .route_layer(middleware::from_fn_with_state(AllowedRoles::ADMIN, role_gate)),
        )
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state.user_service.get_user(current_user.id).await?;

    Ok(Json(UserEnvelope {
        success: true,
        message: None,
        user: UserResponse::from(user),
    }))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state
        .user_service
        .update_profile(&current_user, payload.into())
        .await?;

    Ok(Json(UserEnvelope {
        success: true,
        message: Some("Profile updated successfully".to_string()),
        user: UserResponse::from(user),
    }))
}

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/users/me/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .change_password(&current_user, payload.current_password, payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Activate or deactivate a user (admin only)
#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UserEnvelope),
        (status = 400, description = "Invalid user ID"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<UserEnvelope>> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid user ID"))?;

    let user = state
        .user_service
        .set_active(&current_user, id, payload.is_active)
        .await?;

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };

    Ok(Json(UserEnvelope {
        success: true,
        message: Some(message.to_string()),
        user: UserResponse::from(user),
    }))
}
