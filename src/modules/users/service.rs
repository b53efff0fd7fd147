use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, PaginationMeta};

use crate::modules::users::model::{
    PaginatedUsersResponse, UpdateUserStatusDto, User, UserFilterParams,
};

pub struct UserService;

impl UserService {
    #[instrument(skip(db, filters))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::from(" WHERE 1=1");
        let mut params = Vec::new();

        if let Some(role) = &filters.role {
            params.push(role.clone());
            where_clause.push_str(&format!(" AND role = ${}", params.len()));
        }

        if let Some(status) = &filters.status {
            params.push(status.clone());
            where_clause.push_str(&format!(" AND status = ${}", params.len()));
        }

        let count_query = format!("SELECT COUNT(*) FROM users{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT id, name, email, role, status, subscribed_courses, created_at, updated_at
             FROM users{}
             ORDER BY created_at DESC
             LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let users = data_sql.fetch_all(db).await?;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateUserStatusDto,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING id, name, email, role, status, subscribed_courses, created_at, updated_at",
        )
        .bind(dto.status.as_str())
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }
}
