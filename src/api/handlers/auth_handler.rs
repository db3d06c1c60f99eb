//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{SignUp, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::AuthSession;
use crate::types::{trim, Created};

/// Ten digits, or empty to leave the phone unset
pub(crate) static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{10})?$").expect("phone regex is valid")
});

pub(crate) fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<UserRole>().map(|_| ()).map_err(|_| {
        ValidationError::new("role").with_message("Role must be either admin or staff".into())
    })
}

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    /// User display name
    #[serde(deserialize_with = "trim::string")]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name must be between 1 and 50 characters long"
    ))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[serde(deserialize_with = "trim::string")]
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 100,
        message = "Password must be between 6 and 100 characters long"
    ))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
    /// `admin` or `staff`; defaults to `staff`
    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "staff")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "trim::option")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "trim::option")]
    #[validate(regex(path = *PHONE_REGEX, message = "Please provide a valid 10-digit phone number"))]
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
}

impl From<SignUpRequest> for SignUp {
    fn from(req: SignUpRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role.as_deref().map(UserRole::from).unwrap_or_default(),
            organization: req.organization.filter(|o| !o.is_empty()),
            phone: req.phone,
        }
    }
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[serde(deserialize_with = "trim::string")]
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Token plus the authenticated user
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(session: AuthSession, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            token: session.token,
            user: UserResponse::from(session.user),
        }
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<Created<AuthResponse>> {
    let session = state.auth_service.signup(payload.into()).await?;

    Ok(Created(AuthResponse::new(
        session,
        "User registered successfully",
    )))
}

/// Sign in and get a JWT token
#[utoipa::path(
    post,
    path = "/users/signin",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or deactivated account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = state
        .auth_service
        .signin(payload.email, payload.password)
        .await?;

    Ok(Json(AuthResponse::new(session, "Login successful")))
}
