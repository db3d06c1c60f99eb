//! User service - Handles user-related business logic.
//!
//! Profile edits and status changes never touch the password hash.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CurrentUser, ProfileChanges, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update the caller's own profile
    async fn update_profile(&self, actor: &CurrentUser, changes: ProfileChanges)
        -> AppResult<User>;

    /// Activate or deactivate an account (admin only)
    async fn set_active(&self, actor: &CurrentUser, id: Uuid, is_active: bool) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_profile(
        &self,
        actor: &CurrentUser,
        changes: ProfileChanges,
    ) -> AppResult<User> {
        if changes.is_empty() {
            return Err(AppError::validation(
                "At least one field must be provided for update",
            ));
        }

        let user = self.uow.users().update_profile(actor.id, changes).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    async fn set_active(&self, actor: &CurrentUser, id: Uuid, is_active: bool) -> AppResult<User> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        if actor.id == id && !is_active {
            return Err(AppError::bad_request("You cannot deactivate your own account"));
        }

        let user = self.uow.users().set_active(id, is_active).await?;
        tracing::info!(
            user_id = %user.id,
            actor_id = %actor.id,
            is_active,
            "Account status changed"
        );
        Ok(user)
    }
}
