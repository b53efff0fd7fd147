use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, derive_slug};

use crate::modules::material_types::model::{
    CreateMaterialTypeDto, MaterialType, UpdateMaterialTypeDto,
};

const MATERIAL_TYPE_COLUMNS: &str =
    "id, course_id, name, slug, icon, sort_order, is_active, created_at, updated_at";

pub struct MaterialTypeService;

impl MaterialTypeService {
    #[instrument(skip(db, dto), fields(material_type.name = %dto.name))]
    pub async fn create_material_type(
        db: &PgPool,
        dto: CreateMaterialTypeDto,
    ) -> Result<MaterialType, AppError> {
        let course_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(dto.course_id)
                .fetch_one(db)
                .await?;

        if !course_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        let slug = derive_slug(&dto.name);
        if slug.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Name must contain at least one alphanumeric character"
            )));
        }

        let slug_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM material_types WHERE course_id = $1 AND slug = $2)",
        )
        .bind(dto.course_id)
        .bind(&slug)
        .fetch_one(db)
        .await?;

        if slug_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A material type with this name already exists in this course"
            )));
        }

        let query = format!(
            "INSERT INTO material_types (course_id, name, slug, icon, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            MATERIAL_TYPE_COLUMNS
        );
        let material_type = sqlx::query_as::<_, MaterialType>(&query)
            .bind(dto.course_id)
            .bind(&dto.name)
            .bind(&slug)
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
                        "A material type with this name already exists in this course"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(material_type)
    }

    #[instrument(skip(db))]
    pub async fn get_material_types(
        db: &PgPool,
        course_id: Uuid,
        include_all: bool,
    ) -> Result<Vec<MaterialType>, AppError> {
        let query = if include_all {
            format!(
                "SELECT {} FROM material_types WHERE course_id = $1 ORDER BY sort_order ASC",
                MATERIAL_TYPE_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM material_types
                 WHERE course_id = $1 AND is_active = TRUE
                 ORDER BY sort_order ASC",
                MATERIAL_TYPE_COLUMNS
            )
        };

        let material_types = sqlx::query_as::<_, MaterialType>(&query)
            .bind(course_id)
            .fetch_all(db)
            .await?;

        Ok(material_types)
    }

    #[instrument(skip(db))]
    pub async fn get_material_type_by_id(
        db: &PgPool,
        material_type_id: Uuid,
    ) -> Result<MaterialType, AppError> {
        let query = format!(
            "SELECT {} FROM material_types WHERE id = $1",
            MATERIAL_TYPE_COLUMNS
        );
        let material_type = sqlx::query_as::<_, MaterialType>(&query)
            .bind(material_type_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Material type not found")))?;

        Ok(material_type)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_material_type(
        db: &PgPool,
        material_type_id: Uuid,
        dto: UpdateMaterialTypeDto,
    ) -> Result<MaterialType, AppError> {
        let existing = Self::get_material_type_by_id(db, material_type_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let slug = derive_slug(&name);
        if slug.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Name must contain at least one alphanumeric character"
            )));
        }

        if slug != existing.slug {
            let slug_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM material_types
                 WHERE course_id = $1 AND slug = $2 AND id <> $3)",
            )
            .bind(existing.course_id)
            .bind(&slug)
            .bind(material_type_id)
            .fetch_one(db)
            .await?;

            if slug_taken {
                return Err(AppError::conflict(anyhow::anyhow!(
                    "A material type with this name already exists in this course"
                )));
            }
        }

        let icon = if dto.icon.is_some() {
            dto.icon
        } else {
            existing.icon
        };

        let query = format!(
            "UPDATE material_types
             SET name = $1, slug = $2, icon = $3, sort_order = $4, is_active = $5,
                 updated_at = NOW()
             WHERE id = $6
             RETURNING {}",
            MATERIAL_TYPE_COLUMNS
        );
        let material_type = sqlx::query_as::<_, MaterialType>(&query)
            .bind(&name)
            .bind(&slug)
            .bind(&icon)
            .bind(dto.sort_order.unwrap_or(existing.sort_order))
            .bind(dto.is_active.unwrap_or(existing.is_active))
            .bind(material_type_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A material type with this name already exists in this course"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(material_type)
    }

    /// Cascade delete: the type's materials go first, then the type itself,
    /// inside one transaction.
    #[instrument(skip(db))]
    pub async fn delete_material_type(
        db: &PgPool,
        material_type_id: Uuid,
    ) -> Result<(), AppError> {
        let type_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM material_types WHERE id = $1)",
        )
        .bind(material_type_id)
        .fetch_one(db)
        .await?;

        if !type_exists {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Material type not found"
            )));
        }

        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM materials WHERE material_type_id = $1")
            .bind(material_type_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM material_types WHERE id = $1")
            .bind(material_type_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Material type not found"
            )));
        }

        tx.commit().await?;

        Ok(())
    }
}
