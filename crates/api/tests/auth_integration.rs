//! Integration tests for authentication endpoints.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL or use the default local test database.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_all_test_data, create_authenticated_user, create_test_app, create_test_pool,
    get_request_with_auth, json_request, parse_response_body, run_migrations, test_config,
    TestUser,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_success() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new().with_phone("0911111111");
    let request = json_request(
        Method::POST,
        "/api/auth/register",
        json!({
            "email": user.email,
            "password": user.password,
            "fullName": user.full_name,
            "phone": user.phone,
        }),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["role"], json!("member"));
    assert_eq!(body["data"]["user"]["points"], json!(0));
    assert!(body["data"]["tokens"]["accessToken"].as_str().is_some());
    assert!(body["data"]["tokens"]["refreshToken"].as_str().is_some());

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let request = json_request(
        Method::POST,
        "/api/auth/register",
        json!({
            "email": user.email,
            "password": user.password,
            "fullName": user.full_name,
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], json!(false));

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_register_weak_password() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let request = json_request(
        Method::POST,
        "/api/auth/register",
        json!({
            "email": common::unique_test_email(),
            "password": "alllowercase1",
            "fullName": "Weak Password",
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_login_success_and_wrong_password() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let request = json_request(
        Method::POST,
        "/api/auth/login",
        json!({ "email": user.email, "password": user.password }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["tokens"]["accessToken"].as_str().is_some());

    let request = json_request(
        Method::POST,
        "/api/auth/login",
        json!({ "email": user.email, "password": "WrongP4ssword" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let request = json_request(
        Method::POST,
        "/api/auth/refresh",
        json!({ "refreshToken": auth.refresh_token }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(body["data"]["accessToken"].as_str().is_some());
    assert!(body["data"]["refreshToken"].as_str().is_some());

    // An access token is not accepted as a refresh token
    let request = json_request(
        Method::POST,
        "/api/auth/refresh",
        json!({ "refreshToken": auth.access_token }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/activities")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = get_request_with_auth("/api/activities", "not-a-real-token");
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_all_test_data(&pool).await;
}
