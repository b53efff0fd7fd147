use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use acadex::config::cors::CorsConfig;
use acadex::config::email::EmailConfig;
use acadex::config::jwt::JwtConfig;
use acadex::config::media::MediaConfig;
use acadex::router::init_router;
use acadex::state::AppState;
use acadex_core::hash_password;
use acadex_core::media::LocalMediaStore;

/// Build the full application router on top of a test pool, mirroring
/// production wiring minus the live database connect.
pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let media_config = MediaConfig::from_env();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        media: Arc::new(LocalMediaStore::new(
            std::env::temp_dir().join("acadex-test-media"),
            "http://localhost:3000/media".to_string(),
            media_config.max_file_size,
        )),
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

/// Create a user with the given role ("admin" or "student"). Accounts start
/// active; suspend them with [`set_user_status`].
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, role: &str) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind("Test User")
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[allow(dead_code)]
pub async fn set_user_status(pool: &PgPool, user_id: Uuid, status: &str) {
    sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn create_test_class(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO classes (name, slug) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(acadex_core::derive_slug(name))
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_course(pool: &PgPool, class_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO courses (class_id, name, slug) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(class_id)
    .bind(name)
    .bind(acadex_core::derive_slug(name))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
