//! Authentication service - signup, signin and credential changes.
//!
//! Password hashing is delegated to the domain `Password` value object and
//! runs only when a plaintext credential is being set.

use async_trait::async_trait;
use std::sync::Arc;

use super::token_service::{Claims, TokenIssuer};
use crate::domain::{normalize_email, CurrentUser, NewUser, Password, SignUp, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// A freshly authenticated user and their bearer token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and sign it in
    async fn signup(&self, input: SignUp) -> AppResult<AuthSession>;

    /// Exchange email and password for a token
    async fn signin(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Verify a bearer token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Replace the caller's password after checking the current one
    async fn change_password(
        &self,
        actor: &CurrentUser,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenIssuer>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<TokenIssuer>) -> Self {
        Self { uow, tokens }
    }

    fn session(&self, user: User) -> AppResult<AuthSession> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn signup(&self, input: SignUp) -> AppResult<AuthSession> {
        let email = normalize_email(&input.email);

        if self.uow.users().find_by_email(&email).await?.is_some() {
            tracing::debug!(%email, "Signup rejected: email already registered");
            return Err(AppError::conflict(
                "Email already registered. Please login instead.",
            ));
        }

        let password_hash = Password::new_blocking(input.password).await?.into_string();

        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: input.name,
                role: input.role,
                organization: input.organization,
                phone: input.phone.filter(|p| !p.is_empty()),
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        self.session(user)
    }

    async fn signin(&self, email: String, password: String) -> AppResult<AuthSession> {
        let email = normalize_email(&email);

        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let stored = Password::from_hash(user.password_hash.clone());
        if !stored.verify_blocking(password).await? {
            tracing::debug!(user_id = %user.id, "Signin rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        tracing::info!(user_id = %user.id, "User signed in");
        self.session(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token).map_err(AppError::from)
    }

    async fn change_password(
        &self,
        actor: &CurrentUser,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let stored = Password::from_hash(user.password_hash);
        if !stored.verify_blocking(current_password).await? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = Password::new_blocking(new_password).await?.into_string();
        self.uow
            .users()
            .update_password(actor.id, password_hash)
            .await?;

        tracing::info!(user_id = %actor.id, "Password changed");
        Ok(())
    }
}
