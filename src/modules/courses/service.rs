use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, derive_slug};

use crate::modules::courses::model::{
    Course, CourseFilterParams, CourseWithMaterials, CreateCourseDto, UpdateCourseDto,
};
use crate::modules::material_types::model::MaterialType;
use crate::modules::materials::model::Material;
use crate::modules::premium_content::model::PremiumContent;

const COURSE_COLUMNS: &str = "id, class_id, name, slug, description, thumbnail_url, \
     thumbnail_public_id, icon, tags, instructor, sort_order, is_active, created_at, updated_at";

/// Deduplicate tags while preserving their order.
fn normalize_tags(tags: Option<Vec<String>>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.unwrap_or_default()
        .into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto), fields(course.name = %dto.name))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let class_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
                .bind(dto.class_id)
                .fetch_one(db)
                .await?;

        if !class_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        let slug = derive_slug(&dto.name);
        if slug.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Name must contain at least one alphanumeric character"
            )));
        }

        // Fast-path check; the (class_id, slug) unique index is the backstop
        // against the check-then-create race.
        let slug_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE class_id = $1 AND slug = $2)",
        )
        .bind(dto.class_id)
        .bind(&slug)
        .fetch_one(db)
        .await?;

        if slug_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A course with this name already exists in this class"
            )));
        }

        let query = format!(
            "INSERT INTO courses (class_id, name, slug, description, thumbnail_url,
                                  thumbnail_public_id, icon, tags, instructor, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {}",
            COURSE_COLUMNS
        );
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(dto.class_id)
            .bind(&dto.name)
            .bind(&slug)
            .bind(&dto.description)
            .bind(&dto.thumbnail_url)
            .bind(&dto.thumbnail_public_id)
            .bind(&dto.icon)
            .bind(normalize_tags(dto.tags))
            .bind(&dto.instructor)
            .bind(dto.sort_order.unwrap_or(0))
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A course with this name already exists in this class"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(course)
    }

    /// List courses. Public reads only see active courses whose class still
    /// resolves to an active class, so rows orphaned by a class delete never
    /// leak into the catalog. Admin reads with `include_all` see everything.
    #[instrument(skip(db, filters))]
    pub async fn get_courses(
        db: &PgPool,
        filters: &CourseFilterParams,
        include_all: bool,
    ) -> Result<Vec<Course>, AppError> {
        let courses = if include_all {
            match filters.class_id {
                Some(class_id) => {
                    let query = format!(
                        "SELECT {} FROM courses WHERE class_id = $1 ORDER BY sort_order ASC",
                        COURSE_COLUMNS
                    );
                    sqlx::query_as::<_, Course>(&query)
                        .bind(class_id)
                        .fetch_all(db)
                        .await?
                }
                None => {
                    let query =
                        format!("SELECT {} FROM courses ORDER BY sort_order ASC", COURSE_COLUMNS);
                    sqlx::query_as::<_, Course>(&query).fetch_all(db).await?
                }
            }
        } else {
            let columns = COURSE_COLUMNS
                .split(", ")
                .map(|col| format!("c.{}", col))
                .collect::<Vec<_>>()
                .join(", ");
            match filters.class_id {
                Some(class_id) => {
                    let query = format!(
                        "SELECT {} FROM courses c
                         INNER JOIN classes cl ON cl.id = c.class_id AND cl.is_active = TRUE
                         WHERE c.is_active = TRUE AND c.class_id = $1
                         ORDER BY c.sort_order ASC",
                        columns
                    );
                    sqlx::query_as::<_, Course>(&query)
                        .bind(class_id)
                        .fetch_all(db)
                        .await?
                }
                None => {
                    let query = format!(
                        "SELECT {} FROM courses c
                         INNER JOIN classes cl ON cl.id = c.class_id AND cl.is_active = TRUE
                         WHERE c.is_active = TRUE
                         ORDER BY c.sort_order ASC",
                        columns
                    );
                    sqlx::query_as::<_, Course>(&query).fetch_all(db).await?
                }
            }
        };

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, course_id: Uuid) -> Result<Course, AppError> {
        let query = format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS);
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(course_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        Ok(course)
    }

    /// Aggregate read: the course plus its active material types, materials,
    /// and premium content, mirroring the visibility rules of the list
    /// endpoints. Non-admin callers get 404 for an inactive course.
    #[instrument(skip(db))]
    pub async fn get_course_with_materials(
        db: &PgPool,
        course_id: Uuid,
        include_inactive: bool,
    ) -> Result<CourseWithMaterials, AppError> {
        let course = Self::get_course_by_id(db, course_id).await?;

        if !course.is_active && !include_inactive {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        let material_types = sqlx::query_as::<_, MaterialType>(
            "SELECT id, course_id, name, slug, icon, sort_order, is_active, created_at, updated_at
             FROM material_types
             WHERE course_id = $1 AND is_active = TRUE
             ORDER BY sort_order ASC",
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        let materials = sqlx::query_as::<_, Material>(
            "SELECT id, material_type_id, course_id, title, description, file_url,
                    file_public_id, file_type, file_name, sort_order, is_active,
                    created_at, updated_at
             FROM materials
             WHERE course_id = $1 AND is_active = TRUE
             ORDER BY sort_order ASC",
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        let premium_content = sqlx::query_as::<_, PremiumContent>(
            "SELECT id, course_id, title, description, price, video_count, past_paper_count,
                    quiz_count, notes_count, other_features, is_active, created_at, updated_at
             FROM premium_content
             WHERE course_id = $1 AND is_active = TRUE
             ORDER BY created_at ASC",
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(CourseWithMaterials {
            course,
            material_types,
            materials,
            premium_content,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        course_id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course_by_id(db, course_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let slug = derive_slug(&name);
        if slug.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Name must contain at least one alphanumeric character"
            )));
        }

        if slug != existing.slug {
            let slug_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM courses
                 WHERE class_id IS NOT DISTINCT FROM $1 AND slug = $2 AND id <> $3)",
            )
            .bind(existing.class_id)
            .bind(&slug)
            .bind(course_id)
            .fetch_one(db)
            .await?;

            if slug_taken {
                return Err(AppError::conflict(anyhow::anyhow!(
                    "A course with this name already exists in this class"
                )));
            }
        }

        let description = if dto.description.is_some() {
            dto.description
        } else {
            existing.description
        };
        let thumbnail_url = if dto.thumbnail_url.is_some() {
            dto.thumbnail_url
        } else {
            existing.thumbnail_url
        };
        let thumbnail_public_id = if dto.thumbnail_public_id.is_some() {
            dto.thumbnail_public_id
        } else {
            existing.thumbnail_public_id
        };
        let icon = if dto.icon.is_some() {
            dto.icon
        } else {
            existing.icon
        };
        let tags = match dto.tags {
            Some(tags) => normalize_tags(Some(tags)),
            None => existing.tags,
        };
        let instructor = if dto.instructor.is_some() {
            dto.instructor
        } else {
            existing.instructor
        };

        let query = format!(
            "UPDATE courses
             SET name = $1, slug = $2, description = $3, thumbnail_url = $4,
                 thumbnail_public_id = $5, icon = $6, tags = $7, instructor = $8,
                 sort_order = $9, is_active = $10, updated_at = NOW()
             WHERE id = $11
             RETURNING {}",
            COURSE_COLUMNS
        );
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(&name)
            .bind(&slug)
            .bind(&description)
            .bind(&thumbnail_url)
            .bind(&thumbnail_public_id)
            .bind(&icon)
            .bind(&tags)
            .bind(&instructor)
            .bind(dto.sort_order.unwrap_or(existing.sort_order))
            .bind(dto.is_active.unwrap_or(existing.is_active))
            .bind(course_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A course with this name already exists in this class"
                    ));
                }
                AppError::from(e)
            })?;

        Ok(course)
    }

    /// Cascade delete: every material, material type, and premium content row
    /// referencing the course goes first, then the course itself, all inside
    /// one transaction. Either everything is deleted or nothing is.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, course_id: Uuid) -> Result<(), AppError> {
        let course_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(course_id)
                .fetch_one(db)
                .await?;

        if !course_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM materials WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM material_types WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM premium_content WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Lost a race with a concurrent delete; the rolled-back
            // transaction leaves the children untouched.
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Add a course to the caller's subscriptions. Subscribing twice is a
    /// no-op.
    #[instrument(skip(db))]
    pub async fn subscribe(db: &PgPool, course_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let course_available = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        if !course_available {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        sqlx::query(
            "UPDATE users
             SET subscribed_courses = array_append(subscribed_courses, $1), updated_at = NOW()
             WHERE id = $2 AND NOT ($1 = ANY(subscribed_courses))",
        )
        .bind(course_id)
        .bind(user_id)
        .execute(db)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn create_test_class(pool: &PgPool, name: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO classes (name, slug) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(derive_slug(name))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn create_dto(class_id: Uuid, name: &str) -> CreateCourseDto {
        CreateCourseDto {
            class_id,
            name: name.to_string(),
            description: None,
            thumbnail_url: None,
            thumbnail_public_id: None,
            icon: None,
            tags: None,
            instructor: None,
            sort_order: None,
            is_active: None,
        }
    }

    async fn attach_children(pool: &PgPool, course_id: Uuid, active: bool) -> (Uuid, Uuid, Uuid) {
        let material_type_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO material_types (course_id, name, slug, is_active)
             VALUES ($1, 'Notes', 'notes', $2) RETURNING id",
        )
        .bind(course_id)
        .bind(active)
        .fetch_one(pool)
        .await
        .unwrap();

        let material_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO materials (material_type_id, course_id, title, is_active)
             VALUES ($1, $2, 'Chapter 1', $3) RETURNING id",
        )
        .bind(material_type_id)
        .bind(course_id)
        .bind(active)
        .fetch_one(pool)
        .await
        .unwrap();

        let premium_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO premium_content (course_id, title, price, is_active)
             VALUES ($1, 'Full access', 29.99, $2) RETURNING id",
        )
        .bind(course_id)
        .bind(active)
        .fetch_one(pool)
        .await
        .unwrap();

        (material_type_id, material_id, premium_id)
    }

    async fn count(pool: &PgPool, table: &str, course_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE course_id = $1",
            table
        ))
        .bind(course_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_course_derives_scoped_slug(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;

        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry A2!!"))
            .await
            .unwrap();

        assert_eq!(course.slug, "chemistry-a2");
        assert_eq!(course.class_id, Some(class_id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_course_unknown_class_not_found(pool: PgPool) {
        let result = CourseService::create_course(&pool, create_dto(Uuid::new_v4(), "Maths")).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_name_same_class_conflicts(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;

        CourseService::create_course(&pool, create_dto(class_id, "Maths"))
            .await
            .unwrap();
        let result = CourseService::create_course(&pool, create_dto(class_id, "Maths")).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_same_name_different_classes_both_succeed(pool: PgPool) {
        let class1 = create_test_class(&pool, "A Level").await;
        let class2 = create_test_class(&pool, "IGCSE").await;

        let result1 = CourseService::create_course(&pool, create_dto(class1, "Maths")).await;
        let result2 = CourseService::create_course(&pool, create_dto(class2, "Maths")).await;

        assert!(result1.is_ok());
        assert!(result2.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_cascade_delete_removes_every_child(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry"))
            .await
            .unwrap();
        attach_children(&pool, course.id, true).await;

        CourseService::delete_course(&pool, course.id).await.unwrap();

        assert_eq!(count(&pool, "materials", course.id).await, 0);
        assert_eq!(count(&pool, "material_types", course.id).await, 0);
        assert_eq!(count(&pool, "premium_content", course.id).await, 0);
        let course_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE id = $1")
                .bind(course.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(course_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_course_touches_nothing(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry"))
            .await
            .unwrap();
        attach_children(&pool, course.id, true).await;

        let result = CourseService::delete_course(&pool, Uuid::new_v4()).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
        assert_eq!(count(&pool, "materials", course.id).await, 1);
        assert_eq!(count(&pool, "material_types", course.id).await, 1);
        assert_eq!(count(&pool, "premium_content", course.id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_public_list_excludes_inactive_courses(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        CourseService::create_course(&pool, create_dto(class_id, "Visible"))
            .await
            .unwrap();
        let mut hidden = create_dto(class_id, "Hidden");
        hidden.is_active = Some(false);
        CourseService::create_course(&pool, hidden).await.unwrap();

        let filters = CourseFilterParams {
            class_id: None,
            all: None,
        };
        let public = CourseService::get_courses(&pool, &filters, false).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].name, "Visible");

        let all = CourseService::get_courses(&pool, &filters, true).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_public_list_excludes_orphaned_courses(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry"))
            .await
            .unwrap();

        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(&pool)
            .await
            .unwrap();

        let filters = CourseFilterParams {
            class_id: None,
            all: None,
        };
        let public = CourseService::get_courses(&pool, &filters, false).await.unwrap();
        assert!(public.is_empty());

        // Admin reads still see the orphan so it can be re-homed
        let all = CourseService::get_courses(&pool, &filters, true).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, course.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_scoped_by_class(pool: PgPool) {
        let class1 = create_test_class(&pool, "A Level").await;
        let class2 = create_test_class(&pool, "IGCSE").await;
        CourseService::create_course(&pool, create_dto(class1, "Chemistry"))
            .await
            .unwrap();
        CourseService::create_course(&pool, create_dto(class2, "Biology"))
            .await
            .unwrap();

        let filters = CourseFilterParams {
            class_id: Some(class1),
            all: None,
        };
        let courses = CourseService::get_courses(&pool, &filters, false).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "Chemistry");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_aggregate_read_filters_inactive_children(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry"))
            .await
            .unwrap();
        attach_children(&pool, course.id, true).await;
        attach_children(&pool, course.id, false).await;

        let detail = CourseService::get_course_with_materials(&pool, course.id, false)
            .await
            .unwrap();

        assert_eq!(detail.material_types.len(), 1);
        assert_eq!(detail.materials.len(), 1);
        assert_eq!(detail.premium_content.len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_aggregate_read_hides_inactive_course_from_public(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let mut dto = create_dto(class_id, "Chemistry");
        dto.is_active = Some(false);
        let course = CourseService::create_course(&pool, dto).await.unwrap();

        let public = CourseService::get_course_with_materials(&pool, course.id, false).await;
        assert!(public.is_err());
        assert_eq!(public.unwrap_err().status, StatusCode::NOT_FOUND);

        let admin = CourseService::get_course_with_materials(&pool, course.id, true).await;
        assert!(admin.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rename_back_restores_slug(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry A2"))
            .await
            .unwrap();

        let update = |name: &str| UpdateCourseDto {
            name: Some(name.to_string()),
            description: None,
            thumbnail_url: None,
            thumbnail_public_id: None,
            icon: None,
            tags: None,
            instructor: None,
            sort_order: None,
            is_active: None,
        };

        let renamed = CourseService::update_course(&pool, course.id, update("Physics A2"))
            .await
            .unwrap();
        assert_eq!(renamed.slug, "physics-a2");

        let restored = CourseService::update_course(&pool, course.id, update("Chemistry A2"))
            .await
            .unwrap();
        assert_eq!(restored.slug, course.slug);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_subscribe_is_idempotent(pool: PgPool) {
        let class_id = create_test_class(&pool, "A Level").await;
        let course = CourseService::create_course(&pool, create_dto(class_id, "Chemistry"))
            .await
            .unwrap();

        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, password) VALUES ('S', 's@test.com', 'hash')
             RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        CourseService::subscribe(&pool, course.id, user_id).await.unwrap();
        CourseService::subscribe(&pool, course.id, user_id).await.unwrap();

        let subscriptions = sqlx::query_scalar::<_, Vec<Uuid>>(
            "SELECT subscribed_courses FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(subscriptions, vec![course.id]);
    }
}
