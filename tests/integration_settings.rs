mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_user, generate_unique_email, setup_test_app};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

async fn put_settings(
    app: axum::Router,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("PUT")
        .uri("/api/settings")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, body)
}

async fn get_settings(app: axum::Router, token: Option<&str>) -> serde_json::Value {
    let mut builder = Request::builder().method("GET").uri("/api/settings");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_upserts_and_reads_back(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", "admin").await;
    let token = get_auth_token(setup_test_app(pool.clone()), &email, "testpass123").await;

    let (status, body) = put_settings(
        setup_test_app(pool.clone()),
        Some(&token),
        json!({
            "contact_email": "hello@acadex.academy",
            "announcement_enabled": true,
            "appointment_slot_minutes": 45
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact_email"], "hello@acadex.academy");
    assert_eq!(body["announcement_enabled"], true);
    assert_eq!(body["appointment_slot_minutes"], 45.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_read_omits_admin_only_keys(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", "admin").await;
    let token = get_auth_token(setup_test_app(pool.clone()), &email, "testpass123").await;

    put_settings(
        setup_test_app(pool.clone()),
        Some(&token),
        json!({
            "contact_email": "hello@acadex.academy",
            "registration_enabled": false
        }),
    )
    .await;

    // Anonymous callers only see allow-listed keys; the rest are absent,
    // not redacted
    let public = get_settings(setup_test_app(pool.clone()), None).await;
    assert_eq!(public["contact_email"], "hello@acadex.academy");
    assert!(public.get("registration_enabled").is_none());

    let admin = get_settings(setup_test_app(pool.clone()), Some(&token)).await;
    assert_eq!(admin["registration_enabled"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_read_is_public_tier(pool: PgPool) {
    let admin_email = generate_unique_email();
    create_test_user(&pool, &admin_email, "testpass123", "admin").await;
    let admin_token = get_auth_token(setup_test_app(pool.clone()), &admin_email, "testpass123").await;
    put_settings(
        setup_test_app(pool.clone()),
        Some(&admin_token),
        json!({"registration_enabled": true}),
    )
    .await;

    let student_email = generate_unique_email();
    create_test_user(&pool, &student_email, "testpass123", "student").await;
    let student_token =
        get_auth_token(setup_test_app(pool.clone()), &student_email, "testpass123").await;

    let settings = get_settings(setup_test_app(pool.clone()), Some(&student_token)).await;
    assert!(settings.get("registration_enabled").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_key_rejected(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", "admin").await;
    let token = get_auth_token(setup_test_app(pool.clone()), &email, "testpass123").await;

    let (status, _) = put_settings(
        setup_test_app(pool.clone()),
        Some(&token),
        json!({"totally_made_up": "value"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_write_requires_admin(pool: PgPool) {
    let (status, _) = put_settings(
        setup_test_app(pool.clone()),
        None,
        json!({"contact_email": "x@y.z"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let student_email = generate_unique_email();
    create_test_user(&pool, &student_email, "testpass123", "student").await;
    let student_token =
        get_auth_token(setup_test_app(pool.clone()), &student_email, "testpass123").await;

    let (status, _) = put_settings(
        setup_test_app(pool.clone()),
        Some(&student_token),
        json!({"contact_email": "x@y.z"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
