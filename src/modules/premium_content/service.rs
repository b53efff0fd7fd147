use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::AppError;

use crate::modules::premium_content::model::{
    CreatePremiumContentDto, PremiumContent, UpdatePremiumContentDto,
};

const PREMIUM_COLUMNS: &str = "id, course_id, title, description, price, video_count, \
     past_paper_count, quiz_count, notes_count, other_features, is_active, created_at, updated_at";

pub struct PremiumContentService;

impl PremiumContentService {
    #[instrument(skip(db, dto), fields(premium.title = %dto.title))]
    pub async fn create_premium_content(
        db: &PgPool,
        dto: CreatePremiumContentDto,
    ) -> Result<PremiumContent, AppError> {
        let course_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(dto.course_id)
                .fetch_one(db)
                .await?;

        if !course_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        let query = format!(
            "INSERT INTO premium_content (course_id, title, description, price, video_count,
                                          past_paper_count, quiz_count, notes_count,
                                          other_features, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            PREMIUM_COLUMNS
        );
        let premium = sqlx::query_as::<_, PremiumContent>(&query)
            .bind(dto.course_id)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(dto.price)
            .bind(dto.video_count.unwrap_or(0))
            .bind(dto.past_paper_count.unwrap_or(0))
            .bind(dto.quiz_count.unwrap_or(0))
            .bind(dto.notes_count.unwrap_or(0))
            .bind(dto.other_features.unwrap_or_default())
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(db)
            .await?;

        Ok(premium)
    }

    #[instrument(skip(db))]
    pub async fn get_premium_content(
        db: &PgPool,
        course_id: Uuid,
        include_all: bool,
    ) -> Result<Vec<PremiumContent>, AppError> {
        let query = if include_all {
            format!(
                "SELECT {} FROM premium_content WHERE course_id = $1 ORDER BY created_at ASC",
                PREMIUM_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM premium_content
                 WHERE course_id = $1 AND is_active = TRUE
                 ORDER BY created_at ASC",
                PREMIUM_COLUMNS
            )
        };

        let premium = sqlx::query_as::<_, PremiumContent>(&query)
            .bind(course_id)
            .fetch_all(db)
            .await?;

        Ok(premium)
    }

    #[instrument(skip(db))]
    pub async fn get_premium_content_by_id(
        db: &PgPool,
        premium_id: Uuid,
    ) -> Result<PremiumContent, AppError> {
        let query = format!(
            "SELECT {} FROM premium_content WHERE id = $1",
            PREMIUM_COLUMNS
        );
        let premium = sqlx::query_as::<_, PremiumContent>(&query)
            .bind(premium_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Premium content not found")))?;

        Ok(premium)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_premium_content(
        db: &PgPool,
        premium_id: Uuid,
        dto: UpdatePremiumContentDto,
    ) -> Result<PremiumContent, AppError> {
        let existing = Self::get_premium_content_by_id(db, premium_id).await?;

        let description = if dto.description.is_some() {
            dto.description
        } else {
            existing.description
        };

        let query = format!(
            "UPDATE premium_content
             SET title = $1, description = $2, price = $3, video_count = $4,
                 past_paper_count = $5, quiz_count = $6, notes_count = $7,
                 other_features = $8, is_active = $9, updated_at = NOW()
             WHERE id = $10
             RETURNING {}",
            PREMIUM_COLUMNS
        );
        let premium = sqlx::query_as::<_, PremiumContent>(&query)
            .bind(dto.title.unwrap_or(existing.title))
            .bind(&description)
            .bind(dto.price.unwrap_or(existing.price))
            .bind(dto.video_count.unwrap_or(existing.video_count))
            .bind(dto.past_paper_count.unwrap_or(existing.past_paper_count))
            .bind(dto.quiz_count.unwrap_or(existing.quiz_count))
            .bind(dto.notes_count.unwrap_or(existing.notes_count))
            .bind(dto.other_features.unwrap_or(existing.other_features))
            .bind(dto.is_active.unwrap_or(existing.is_active))
            .bind(premium_id)
            .fetch_one(db)
            .await?;

        Ok(premium)
    }

    /// Leaf delete: premium content has no dependents.
    #[instrument(skip(db))]
    pub async fn delete_premium_content(db: &PgPool, premium_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM premium_content WHERE id = $1")
            .bind(premium_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Premium content not found"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn create_test_course(pool: &PgPool) -> Uuid {
        let class_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO classes (name, slug) VALUES ('A Level', 'a-level') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO courses (class_id, name, slug) VALUES ($1, 'Chemistry', 'chemistry')
             RETURNING id",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn create_dto(course_id: Uuid, title: &str, price: f64) -> CreatePremiumContentDto {
        CreatePremiumContentDto {
            course_id,
            title: title.to_string(),
            description: None,
            price,
            video_count: None,
            past_paper_count: None,
            quiz_count: None,
            notes_count: None,
            other_features: None,
            is_active: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_premium_content(pool: PgPool) {
        let course_id = create_test_course(&pool).await;

        let premium = PremiumContentService::create_premium_content(
            &pool,
            create_dto(course_id, "Full access", 29.99),
        )
        .await
        .unwrap();

        assert_eq!(premium.course_id, course_id);
        assert_eq!(premium.price, 29.99);
        assert_eq!(premium.video_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_unknown_course_not_found(pool: PgPool) {
        let result = PremiumContentService::create_premium_content(
            &pool,
            create_dto(Uuid::new_v4(), "Full access", 10.0),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_filters_inactive(pool: PgPool) {
        let course_id = create_test_course(&pool).await;
        PremiumContentService::create_premium_content(
            &pool,
            create_dto(course_id, "Visible", 10.0),
        )
        .await
        .unwrap();
        let mut hidden = create_dto(course_id, "Hidden", 20.0);
        hidden.is_active = Some(false);
        PremiumContentService::create_premium_content(&pool, hidden)
            .await
            .unwrap();

        let public = PremiumContentService::get_premium_content(&pool, course_id, false)
            .await
            .unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].title, "Visible");

        let all = PremiumContentService::get_premium_content(&pool, course_id, true)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_premium_content(pool: PgPool) {
        let course_id = create_test_course(&pool).await;
        let premium = PremiumContentService::create_premium_content(
            &pool,
            create_dto(course_id, "Full access", 10.0),
        )
        .await
        .unwrap();

        PremiumContentService::delete_premium_content(&pool, premium.id)
            .await
            .unwrap();

        let result = PremiumContentService::delete_premium_content(&pool, premium.id).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }
}
