use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, derive_slug};

use crate::modules::classes::model::{Class, CreateClassDto, UpdateClassDto};

const CLASS_COLUMNS: &str =
    "id, name, slug, description, icon, sort_order, is_active, created_at, updated_at";

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db, dto), fields(class.name = %dto.name))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let slug = derive_slug(&dto.name);
        if slug.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Name must contain at least one alphanumeric character"
            )));
        }

        // Fast-path check for a friendlier message; the unique index on slug
        // is the authoritative backstop against concurrent creates.
        let slug_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE slug = $1)")
                .bind(&slug)
                .fetch_one(db)
                .await?;

        if slug_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A class with this name already exists"
            )));
        }

        let query = format!(
            "INSERT INTO classes (name, slug, description, icon, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            CLASS_COLUMNS
        );
        let class = sqlx::query_as::<_, Class>(&query)
            .bind(&dto.name)
            .bind(&slug)
            .bind(&dto.description)
            .bind(&dto.icon)
            .bind(dto.sort_order.unwrap_or(0))
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A class with this name already exists"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn get_classes(db: &PgPool, include_all: bool) -> Result<Vec<Class>, AppError> {
        let query = if include_all {
            format!(
                "SELECT {} FROM classes ORDER BY sort_order ASC",
                CLASS_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM classes WHERE is_active = TRUE ORDER BY sort_order ASC",
                CLASS_COLUMNS
            )
        };

        let classes = sqlx::query_as::<_, Class>(&query).fetch_all(db).await?;

        Ok(classes)
    }

    #[instrument(skip(db))]
    pub async fn get_class_by_id(db: &PgPool, class_id: Uuid) -> Result<Class, AppError> {
        let query = format!("SELECT {} FROM classes WHERE id = $1", CLASS_COLUMNS);
        let class = sqlx::query_as::<_, Class>(&query)
            .bind(class_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        Ok(class)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        class_id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let existing = Self::get_class_by_id(db, class_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let slug = derive_slug(&name);
        if slug.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Name must contain at least one alphanumeric character"
            )));
        }

        // Renames re-derive the slug, so re-check uniqueness against the
        // other rows before the unique index has the final word.
        if slug != existing.slug {
            let slug_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM classes WHERE slug = $1 AND id <> $2)",
            )
            .bind(&slug)
            .bind(class_id)
            .fetch_one(db)
            .await?;

            if slug_taken {
                return Err(AppError::conflict(anyhow::anyhow!(
                    "A class with this name already exists"
                )));
            }
        }

        let description = if dto.description.is_some() {
            dto.description
        } else {
            existing.description
        };
        let icon = if dto.icon.is_some() {
            dto.icon
        } else {
            existing.icon
        };

        let query = format!(
            "UPDATE classes
             SET name = $1, slug = $2, description = $3, icon = $4, sort_order = $5,
                 is_active = $6, updated_at = NOW()
             WHERE id = $7
             RETURNING {}",
            CLASS_COLUMNS
        );
        let class = sqlx::query_as::<_, Class>(&query)
            .bind(&name)
            .bind(&slug)
            .bind(&description)
            .bind(&icon)
            .bind(dto.sort_order.unwrap_or(existing.sort_order))
            .bind(dto.is_active.unwrap_or(existing.is_active))
            .bind(class_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A class with this name already exists"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(class)
    }

    /// Delete a class. Courses under it are intentionally NOT deleted: they
    /// keep their dangling class_id and disappear from public class-scoped
    /// listings, but remain reachable for admins.
    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, class_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        Ok(())
    }
}
