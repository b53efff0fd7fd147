use sqlx::PgPool;

use acadex_core::hash_password;

use crate::modules::users::model::{user_roles, user_status};

/// Create an admin account. Admins are bootstrapped from the command line
/// only; the public registration path always produces students.
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password, role, status)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(user_roles::ADMIN)
    .bind(user_status::ACTIVE)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
