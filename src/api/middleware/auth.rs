//! JWT authentication and role gating middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

pub use crate::domain::CurrentUser;

/// Roles permitted on a route, used as `role_gate` state.
#[derive(Clone, Copy, Debug)]
pub struct AllowedRoles(pub &'static [UserRole]);

impl AllowedRoles {
    pub const ADMIN: AllowedRoles = AllowedRoles(&[UserRole::Admin]);
}

/// JWT authentication middleware.
///
/// Verifies the bearer token, then loads the subject so that role and
/// activation status come from storage rather than from the token.
/// Inserts the `CurrentUser` into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token).map_err(|e| {
        tracing::debug!(code = e.code(), "Bearer token rejected");
        e
    })?;

    let user = state.user_service.get_user(claims.sub).await?;
    if !user.is_active {
        tracing::warn!(user_id = %user.id, "Deactivated account presented a token");
        return Err(AppError::AccountDisabled);
    }

    request.extensions_mut().insert(CurrentUser::from(&user));

    Ok(next.run(request).await)
}

/// Role gate; must run after `auth_middleware`.
pub async fn role_gate(
    State(allowed): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if !user.has_any_role(allowed.0) {
        tracing::debug!(user_id = %user.id, role = %user.role, "Role not permitted");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
