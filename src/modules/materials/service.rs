use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::AppError;

use crate::modules::materials::model::{CreateMaterialDto, Material, UpdateMaterialDto};

const MATERIAL_COLUMNS: &str = "id, material_type_id, course_id, title, description, file_url, \
     file_public_id, file_type, file_name, sort_order, is_active, created_at, updated_at";

pub struct MaterialService;

impl MaterialService {
    /// Create a material under a material type. The parent type supplies the
    /// duplicated `course_id` so course-wide listings never need a join.
    #[instrument(skip(db, dto), fields(material.title = %dto.title))]
    pub async fn create_material(db: &PgPool, dto: CreateMaterialDto) -> Result<Material, AppError> {
        let course_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT course_id FROM material_types WHERE id = $1",
        )
        .bind(dto.material_type_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Material type not found")))?;

        let query = format!(
            "INSERT INTO materials (material_type_id, course_id, title, description, file_url,
                                    file_public_id, file_type, file_name, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            MATERIAL_COLUMNS
        );
        let material = sqlx::query_as::<_, Material>(&query)
            .bind(dto.material_type_id)
            .bind(course_id)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(&dto.file_url)
            .bind(&dto.file_public_id)
            .bind(&dto.file_type)
            .bind(&dto.file_name)
            .bind(dto.sort_order.unwrap_or(0))
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(db)
            .await?;

        Ok(material)
    }

    /// List materials scoped to one parent: a material type or a course.
    /// Exactly one of the two ids must be provided; callers enforce that
    /// before reaching here.
    #[instrument(skip(db))]
    pub async fn get_materials(
        db: &PgPool,
        material_type_id: Option<Uuid>,
        course_id: Option<Uuid>,
        include_all: bool,
    ) -> Result<Vec<Material>, AppError> {
        let (filter_column, parent_id) = match (material_type_id, course_id) {
            (Some(id), _) => ("material_type_id", id),
            (None, Some(id)) => ("course_id", id),
            (None, None) => {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "material_type_id or course_id is required"
                )));
            }
        };

        let query = if include_all {
            format!(
                "SELECT {} FROM materials WHERE {} = $1 ORDER BY sort_order ASC",
                MATERIAL_COLUMNS, filter_column
            )
        } else {
            format!(
                "SELECT {} FROM materials
                 WHERE {} = $1 AND is_active = TRUE
                 ORDER BY sort_order ASC",
                MATERIAL_COLUMNS, filter_column
            )
        };

        let materials = sqlx::query_as::<_, Material>(&query)
            .bind(parent_id)
            .fetch_all(db)
            .await?;

        Ok(materials)
    }

    #[instrument(skip(db))]
    pub async fn get_material_by_id(db: &PgPool, material_id: Uuid) -> Result<Material, AppError> {
        let query = format!("SELECT {} FROM materials WHERE id = $1", MATERIAL_COLUMNS);
        let material = sqlx::query_as::<_, Material>(&query)
            .bind(material_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Material not found")))?;

        Ok(material)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_material(
        db: &PgPool,
        material_id: Uuid,
        dto: UpdateMaterialDto,
    ) -> Result<Material, AppError> {
        let existing = Self::get_material_by_id(db, material_id).await?;

        let description = if dto.description.is_some() {
            dto.description
        } else {
            existing.description
        };
        let file_url = if dto.file_url.is_some() {
            dto.file_url
        } else {
            existing.file_url
        };
        let file_public_id = if dto.file_public_id.is_some() {
            dto.file_public_id
        } else {
            existing.file_public_id
        };
        let file_type = if dto.file_type.is_some() {
            dto.file_type
        } else {
            existing.file_type
        };
        let file_name = if dto.file_name.is_some() {
            dto.file_name
        } else {
            existing.file_name
        };

        let query = format!(
            "UPDATE materials
             SET title = $1, description = $2, file_url = $3, file_public_id = $4,
                 file_type = $5, file_name = $6, sort_order = $7, is_active = $8,
                 updated_at = NOW()
             WHERE id = $9
             RETURNING {}",
            MATERIAL_COLUMNS
        );
        let material = sqlx::query_as::<_, Material>(&query)
            .bind(dto.title.unwrap_or(existing.title))
            .bind(&description)
            .bind(&file_url)
            .bind(&file_public_id)
            .bind(&file_type)
            .bind(&file_name)
            .bind(dto.sort_order.unwrap_or(existing.sort_order))
            .bind(dto.is_active.unwrap_or(existing.is_active))
            .bind(material_id)
            .fetch_one(db)
            .await?;

        Ok(material)
    }

    /// Leaf delete: materials have no dependents.
    #[instrument(skip(db))]
    pub async fn delete_material(db: &PgPool, material_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(material_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Material not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acadex_core::derive_slug;
    use axum::http::StatusCode;

    async fn create_test_hierarchy(pool: &PgPool) -> (Uuid, Uuid) {
        let class_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO classes (name, slug) VALUES ('A Level', 'a-level') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let course_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO courses (class_id, name, slug) VALUES ($1, 'Chemistry', 'chemistry')
             RETURNING id",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let material_type_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO material_types (course_id, name, slug) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(course_id)
        .bind("Notes")
        .bind(derive_slug("Notes"))
        .fetch_one(pool)
        .await
        .unwrap();

        (course_id, material_type_id)
    }

    fn create_dto(material_type_id: Uuid, title: &str) -> CreateMaterialDto {
        CreateMaterialDto {
            material_type_id,
            title: title.to_string(),
            description: None,
            file_url: None,
            file_public_id: None,
            file_type: None,
            file_name: None,
            sort_order: None,
            is_active: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_material_inherits_course_from_parent(pool: PgPool) {
        let (course_id, material_type_id) = create_test_hierarchy(&pool).await;

        let material =
            MaterialService::create_material(&pool, create_dto(material_type_id, "Chapter 1"))
                .await
                .unwrap();

        assert_eq!(material.course_id, course_id);
        assert_eq!(material.material_type_id, material_type_id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_material_unknown_parent_not_found(pool: PgPool) {
        let result =
            MaterialService::create_material(&pool, create_dto(Uuid::new_v4(), "Chapter 1")).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_requires_a_parent_id(pool: PgPool) {
        let result = MaterialService::get_materials(&pool, None, None, false).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_by_either_parent_filters_inactive(pool: PgPool) {
        let (course_id, material_type_id) = create_test_hierarchy(&pool).await;
        MaterialService::create_material(&pool, create_dto(material_type_id, "Visible"))
            .await
            .unwrap();
        let mut hidden = create_dto(material_type_id, "Hidden");
        hidden.is_active = Some(false);
        MaterialService::create_material(&pool, hidden).await.unwrap();

        let by_type = MaterialService::get_materials(&pool, Some(material_type_id), None, false)
            .await
            .unwrap();
        assert_eq!(by_type.len(), 1);

        let by_course = MaterialService::get_materials(&pool, None, Some(course_id), false)
            .await
            .unwrap();
        assert_eq!(by_course.len(), 1);

        let all = MaterialService::get_materials(&pool, Some(material_type_id), None, true)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_material_is_leaf(pool: PgPool) {
        let (_, material_type_id) = create_test_hierarchy(&pool).await;
        let material =
            MaterialService::create_material(&pool, create_dto(material_type_id, "Chapter 1"))
                .await
                .unwrap();

        MaterialService::delete_material(&pool, material.id).await.unwrap();

        let result = MaterialService::delete_material(&pool, material.id).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }
}
