use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, hash_password, verify_password};

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, user_roles, user_status};
use crate::utils::jwt::create_access_token;

use super::model::{LoginRequest, LoginResponse, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(user.email = %dto.email))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&dto.email)
        .fetch_one(db)
        .await?;

        if email_taken {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email already registered"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password, role, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, role, status, subscribed_courses, created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(user_roles::STUDENT)
        .bind(user_status::ACTIVE)
        .fetch_one(db)
        .await
        .map_err(|e| {
            // Backstop for the check-then-create race on the email unique index
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Email already registered"));
            }
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(user.email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            name: String,
            email: String,
            password: String,
            role: String,
            status: String,
            subscribed_courses: Vec<Uuid>,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, email, password, role, status, subscribed_courses,
                    created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        let is_valid = verify_password(&dto.password, &row.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        // Suspension wins over correct credentials
        if row.status == user_status::SUSPENDED {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Account is suspended"
            )));
        }

        let access_token = create_access_token(row.id, &row.email, &row.role, jwt_config)?;

        let user = User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            status: row.status,
            subscribed_courses: row.subscribed_courses,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        Ok(LoginResponse { access_token, user })
    }
}
