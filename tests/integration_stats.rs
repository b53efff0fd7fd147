mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_class, create_test_user, generate_unique_email, setup_test_app};
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

async fn get_stats(pool: &PgPool, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri("/api/stats");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, body)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_requires_admin(pool: PgPool) {
    let (status, _) = get_stats(&pool, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let student_email = generate_unique_email();
    create_test_user(&pool, &student_email, "testpass123", "student").await;
    let student_token =
        get_auth_token(setup_test_app(pool.clone()), &student_email, "testpass123").await;

    let (status, _) = get_stats(&pool, Some(&student_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_reports_counts_and_recents(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", "admin").await;
    let token = get_auth_token(setup_test_app(pool.clone()), &email, "testpass123").await;

    create_test_class(&pool, "A Level").await;
    sqlx::query("INSERT INTO messages (name, email, message) VALUES ('J', 'j@test.com', 'Hi')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO appointments (student_name, email, date, time)
         VALUES ('Sam', 's@test.com', '2026-09-14', '16:00')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = get_stats(&pool, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["classes"], 1);
    assert_eq!(body["counts"]["messages"], 1);
    assert_eq!(body["counts"]["unread_messages"], 1);
    assert_eq!(body["counts"]["pending_appointments"], 1);
    assert_eq!(body["recent_messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["recent_appointments"].as_array().unwrap().len(), 1);
}
