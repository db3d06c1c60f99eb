//! Integration tests for API endpoints.
//!
//! The router runs against in-memory repositories, so these tests cover
//! extractors, the auth gate, role gating, services and error bodies end
//! to end without a database.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{TestApp, PASSWORD};
use expense_tracker::domain::UserRole;
use expense_tracker::services::TokenIssuer;

async fn create_rent(app: &TestApp, token: &str, amount: Value) -> (StatusCode, Value) {
    app.send(
        Method::POST,
        "/expenses/create",
        Some(token),
        Some(json!({
            "title": "Rent",
            "category": "Rent",
            "amount": amount,
            "date": "2025-10-01T00:00:00Z"
        })),
    )
    .await
}

// =============================================================================
// Root / health
// =============================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Expense Tracker API is running".to_string()));
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], json!({"status": "unhealthy"}));
}

// =============================================================================
// Signup / signin
// =============================================================================

#[tokio::test]
async fn test_signup_then_me() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({"name": "A", "email": "a@x.com", "password": "secret1"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "staff");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap().to_string();
    let claims = app.tokens.verify(&token).unwrap();
    assert_eq!(claims.role, UserRole::Staff);

    let (status, body) = app.send(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_signup_duplicate_email_is_bad_request() {
    let app = TestApp::new();
    app.seed_user("a@x.com", UserRole::Staff);

    let (status, body) = app
        .send(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({"name": "Al", "email": "A@X.com", "password": "secret1"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"]["message"],
        "Email already registered. Please login instead."
    );
}

#[tokio::test]
async fn test_signup_validation_details() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/users/signup",
            None,
            Some(json!({"name": " ", "email": "not-an-email", "password": "123"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_signin_failures() {
    let app = TestApp::new();
    let user = app.seed_user("a@x.com", UserRole::Staff);

    let (status, _) = app
        .send(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({"email": "nobody@x.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({"email": "a@x.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let mut inactive = user;
    inactive.is_active = false;
    app.users.insert(inactive);

    let (status, body) = app
        .send(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({"email": "a@x.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_signin_success() {
    let app = TestApp::new();
    app.seed_user("boss@x.com", UserRole::Admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({"email": "boss@x.com", "password": PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["role"], "admin");
}

// =============================================================================
// Auth gate
// =============================================================================

#[tokio::test]
async fn test_missing_or_malformed_header() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/expenses/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, body) = app
        .send(Method::GET, "/expenses/all", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_MALFORMED");
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_rejected() {
    let app = TestApp::new();
    let user = app.seed_user("a@x.com", UserRole::Admin);

    let expired = app
        .tokens
        .issue_at(&user, Utc::now() - Duration::days(8))
        .unwrap();
    let (status, body) = app
        .send(Method::GET, "/expenses/all", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");

    let other_key = TokenIssuer::new(b"another-secret-key-that-is-32-bytes-long", Duration::days(7));
    let foreign = other_key.issue(&user).unwrap();
    let (status, body) = app
        .send(Method::GET, "/expenses/all", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_token_for_missing_user_is_not_found() {
    let app = TestApp::new();
    let user = app.seed_user("ghost@x.com", UserRole::Staff);
    let token = app.token_for(&user);

    let mut ghost = user;
    ghost.id = Uuid::new_v4();
    let ghost_token = app.token_for(&ghost);
    assert_ne!(token, ghost_token);

    let (status, _) = app
        .send(Method::GET, "/users/me", Some(&ghost_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivated_user_token_rejected() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let staff = app.seed_user("staff@x.com", UserRole::Staff);
    let admin_token = app.token_for(&admin);
    let staff_token = app.token_for(&staff);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/users/{}/status", staff.id),
            Some(&admin_token),
            Some(json!({"isActive": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isActive"], false);
    assert_eq!(
        app.users.get(staff.id).unwrap().password_hash,
        staff.password_hash
    );

    let (status, body) = app
        .send(Method::GET, "/users/me", Some(&staff_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_role_comes_from_storage_not_token() {
    let app = TestApp::new();
    let mut user = app.seed_user("a@x.com", UserRole::Admin);
    let token = app.token_for(&user);

    // Demoted after the token was issued
    user.role = UserRole::Staff;
    app.users.insert(user);

    let (status, _) = create_rent(&app, &token, json!(100)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let app = TestApp::new();
    let user = app.seed_user("a@x.com", UserRole::Staff);
    let token = app.token_for(&user);
    let original_hash = user.password_hash.clone();

    let (status, _) = app
        .send(Method::PUT, "/users/me", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PUT,
            "/users/me",
            Some(&token),
            Some(json!({"name": "  Renamed ", "phone": "9876543210"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Renamed");
    assert_eq!(body["user"]["phone"], "9876543210");
    assert_eq!(app.users.get(user.id).unwrap().password_hash, original_hash);

    let (status, _) = app
        .send(
            Method::PUT,
            "/users/me/password",
            Some(&token),
            Some(json!({"currentPassword": "wrong-one", "newPassword": "secret2"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let before = app.users.get(user.id).unwrap().password_hash;
    let (status, _) = app
        .send(
            Method::PUT,
            "/users/me/password",
            Some(&token),
            Some(json!({"currentPassword": PASSWORD, "newPassword": "secret2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(app.users.get(user.id).unwrap().password_hash, before);

    let (status, _) = app
        .send(
            Method::POST,
            "/users/signin",
            None,
            Some(json!({"email": "a@x.com", "password": "secret2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_status_change_requires_admin() {
    let app = TestApp::new();
    let staff = app.seed_user("staff@x.com", UserRole::Staff);
    let token = app.token_for(&staff);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/users/{}/status", staff.id),
            Some(&token),
            Some(json!({"isActive": false})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/users/{}/status", staff.id),
            Some(&app.token_for(&admin)),
            Some(json!({"isActive": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deactivated successfully");

    let stored = app.users.get(staff.id).unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.password_hash, staff.password_hash);
}

// =============================================================================
// Expenses
// =============================================================================

#[tokio::test]
async fn test_create_requires_admin() {
    let app = TestApp::new();
    let staff = app.seed_user("staff@x.com", UserRole::Staff);
    let admin = app.seed_user("boss@x.com", UserRole::Admin);

    let (status, _) = create_rent(&app, &app.token_for(&staff), json!(100)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.expenses.len(), 0);

    let (status, body) = create_rent(&app, &app.token_for(&admin), json!(100)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Expense added successfully");
    assert_eq!(body["data"]["amount"], json!(100.0));
    assert_eq!(body["data"]["branch"], "Main");
    assert_eq!(body["data"]["description"], "");
    assert_eq!(body["data"]["createdBy"], json!(admin.id));
}

#[tokio::test]
async fn test_create_rounds_to_two_places() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);

    let (status, body) = create_rent(&app, &app.token_for(&admin), json!(12.125)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["amount"], json!(12.13));

    let id: Uuid = serde_json::from_value(body["data"]["id"].clone()).unwrap();
    assert_eq!(app.expenses.get(id).unwrap().amount.to_string(), "12.13");
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/expenses/create",
            Some(&token),
            Some(json!({"title": "Trip", "category": "Travel", "amount": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid category");

    let (status, body) = create_rent(&app, &token, json!(0.004)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Amount must be greater than 0");

    let (status, _) = create_rent(&app, &token, json!(1_000_000_000.0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.expenses.len(), 0);
}

#[tokio::test]
async fn test_get_update_delete_cycle() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let token = app.token_for(&admin);

    let (_, body) = create_rent(&app, &token, json!(100)).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(Method::GET, &format!("/expenses/edit/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expense"]["title"], "Rent");
    assert_eq!(body["expense"]["creator"]["email"], "boss@x.com");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/expenses/edit/{}", id),
            Some(&token),
            Some(json!({"amount": 250.5, "branch": "North"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expense"]["amount"], json!(250.5));
    assert_eq!(body["expense"]["branch"], "North");
    assert_eq!(body["expense"]["title"], "Rent");

    let (status, body) = app
        .send(Method::DELETE, &format!("/expenses/delete/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenseId"], id);

    let (status, _) = app
        .send(Method::GET, &format!("/expenses/edit/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejections() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let token = app.token_for(&admin);

    let (_, body) = create_rent(&app, &token, json!(100)).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/expenses/edit/{}", id);

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({"amount": -5})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "At least one field must be provided for update"
    );

    let (status, body) = app
        .send(
            Method::PUT,
            "/expenses/edit/not-a-uuid",
            Some(&token),
            Some(json!({"title": "X"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid expense ID");

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/expenses/edit/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({"title": "X"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Stored record untouched by the rejected updates
    let stored = app.expenses.get(id.parse().unwrap()).unwrap();
    assert_eq!(stored.amount, Decimal::from(100));
}

#[tokio::test]
async fn test_staff_can_read_but_not_edit() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let staff = app.seed_user("staff@x.com", UserRole::Staff);
    let staff_token = app.token_for(&staff);

    let (_, body) = create_rent(&app, &app.token_for(&admin), json!(100)).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(Method::GET, &format!("/expenses/edit/{}", id), Some(&staff_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/expenses/edit/{}", id),
            Some(&staff_token),
            Some(json!({"title": "Changed"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::GET, &format!("/expenses/edit/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_missing_and_invalid() {
    let app = TestApp::new();
    let staff = app.seed_user("staff@x.com", UserRole::Staff);
    let token = app.token_for(&staff);

    let (status, _) = app
        .send(Method::DELETE, "/expenses/delete/123", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/expenses/delete/{}", Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_and_ordering() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let token = app.token_for(&admin);

    for (title, category, amount, date) in [
        ("Rent", "Rent", 15000, "2025-10-01T00:00:00Z"),
        ("Bulbs", "Electricity", 300, "2025-10-05T00:00:00Z"),
        ("Veg", "Groceries", 150, "2025-09-20T00:00:00Z"),
    ] {
        let (status, _) = app
            .send(
                Method::POST,
                "/expenses/create",
                Some(&token),
                Some(json!({"title": title, "category": category, "amount": amount, "date": date})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.send(Method::GET, "/expenses/all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Bulbs", "Rent", "Veg"]);

    let (_, body) = app
        .send(
            Method::GET,
            "/expenses/all?startDate=2025-10-01T00:00:00Z&maxAmount=1000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(body["expenses"][0]["title"], "Bulbs");

    let (status, _) = app
        .send(
            Method::GET,
            "/expenses/all?startDate=2025-10-31T00:00:00Z&endDate=2025-10-01T00:00:00Z",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::GET, "/expenses/all?category=Travel", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary_all_time() {
    let app = TestApp::new();
    let admin = app.seed_user("boss@x.com", UserRole::Admin);
    let token = app.token_for(&admin);

    create_rent(&app, &token, json!(100)).await;
    create_rent(&app, &token, json!(50.25)).await;

    let (status, body) = app
        .send(
            Method::GET,
            "/expenses/summary?range=all_time&top=1",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total"], json!(150.25));
    assert_eq!(body["summary"]["count"], 2);
    assert_eq!(body["summary"]["top"].as_array().unwrap().len(), 1);
    assert_eq!(body["summary"]["top"][0]["category"], "Rent");
}
