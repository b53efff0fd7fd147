use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use acadex_core::{AppError, PaginationMeta};

use crate::modules::messages::model::{
    CreateMessageDto, Message, MessageFilterParams, PaginatedMessagesResponse, message_status,
};

const MESSAGE_COLUMNS: &str =
    "id, name, email, phone, subject, message, status, admin_reply, created_at, updated_at";

pub struct MessageService;

impl MessageService {
    #[instrument(skip(db, dto), fields(message.email = %dto.email))]
    pub async fn create_message(db: &PgPool, dto: CreateMessageDto) -> Result<Message, AppError> {
        let query = format!(
            "INSERT INTO messages (name, email, phone, subject, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            MESSAGE_COLUMNS
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(&dto.phone)
            .bind(&dto.subject)
            .bind(&dto.message)
            .fetch_one(db)
            .await?;

        Ok(message)
    }

    #[instrument(skip(db, filters))]
    pub async fn get_messages(
        db: &PgPool,
        filters: MessageFilterParams,
    ) -> Result<PaginatedMessagesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let (total, messages) = match &filters.status {
            Some(status) => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM messages WHERE status = $1",
                )
                .bind(status)
                .fetch_one(db)
                .await?;

                let query = format!(
                    "SELECT {} FROM messages WHERE status = $1
                     ORDER BY created_at DESC
                     LIMIT {} OFFSET {}",
                    MESSAGE_COLUMNS, limit, offset
                );
                let messages = sqlx::query_as::<_, Message>(&query)
                    .bind(status)
                    .fetch_all(db)
                    .await?;
                (total, messages)
            }
            None => {
                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
                    .fetch_one(db)
                    .await?;

                let query = format!(
                    "SELECT {} FROM messages
                     ORDER BY created_at DESC
                     LIMIT {} OFFSET {}",
                    MESSAGE_COLUMNS, limit, offset
                );
                let messages = sqlx::query_as::<_, Message>(&query).fetch_all(db).await?;
                (total, messages)
            }
        };

        Ok(PaginatedMessagesResponse {
            data: messages,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    /// Fetch a message for the admin view. The first view of an unread
    /// message flips it to read; the guard on the current status makes the
    /// flip happen exactly once even under concurrent views, and a replied
    /// message is never downgraded.
    #[instrument(skip(db))]
    pub async fn get_message_by_id(db: &PgPool, message_id: Uuid) -> Result<Message, AppError> {
        let query = format!(
            "UPDATE messages SET status = $1, updated_at = NOW()
             WHERE id = $2 AND status = $3
             RETURNING {}",
            MESSAGE_COLUMNS
        );
        let flipped = sqlx::query_as::<_, Message>(&query)
            .bind(message_status::READ)
            .bind(message_id)
            .bind(message_status::UNREAD)
            .fetch_optional(db)
            .await?;

        if let Some(message) = flipped {
            return Ok(message);
        }

        let query = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(message_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Message not found")))?;

        Ok(message)
    }

    /// Persist an admin reply. Sets status to replied regardless of the prior
    /// state; a second reply simply overwrites the first and re-stamps the
    /// status. The notification email is the caller's concern and runs after
    /// this has committed.
    #[instrument(skip(db, admin_reply))]
    pub async fn reply_to_message(
        db: &PgPool,
        message_id: Uuid,
        admin_reply: &str,
    ) -> Result<Message, AppError> {
        let query = format!(
            "UPDATE messages SET admin_reply = $1, status = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {}",
            MESSAGE_COLUMNS
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(admin_reply)
            .bind(message_status::REPLIED)
            .bind(message_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Message not found")))?;

        Ok(message)
    }

    #[instrument(skip(db))]
    pub async fn delete_message(db: &PgPool, message_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Message not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn create_dto(name: &str) -> CreateMessageDto {
        CreateMessageDto {
            name: name.to_string(),
            email: "parent@example.com".to_string(),
            phone: None,
            subject: Some("Tutoring enquiry".to_string()),
            message: "Do you offer A2 chemistry tutoring?".to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_new_message_starts_unread(pool: PgPool) {
        let message = MessageService::create_message(&pool, create_dto("Jordan"))
            .await
            .unwrap();

        assert_eq!(message.status, message_status::UNREAD);
        assert!(message.admin_reply.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_first_view_flips_to_read_exactly_once(pool: PgPool) {
        let created = MessageService::create_message(&pool, create_dto("Jordan"))
            .await
            .unwrap();

        let first = MessageService::get_message_by_id(&pool, created.id)
            .await
            .unwrap();
        assert_eq!(first.status, message_status::READ);
        let first_updated_at = first.updated_at;

        let second = MessageService::get_message_by_id(&pool, created.id)
            .await
            .unwrap();
        assert_eq!(second.status, message_status::READ);
        // Second view does not re-trigger the transition
        assert_eq!(second.updated_at, first_updated_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reply_stamps_replied_from_any_state(pool: PgPool) {
        let created = MessageService::create_message(&pool, create_dto("Jordan"))
            .await
            .unwrap();

        // Reply without ever viewing: unread -> replied directly
        let replied = MessageService::reply_to_message(&pool, created.id, "Yes, we do.")
            .await
            .unwrap();
        assert_eq!(replied.status, message_status::REPLIED);
        assert_eq!(replied.admin_reply.as_deref(), Some("Yes, we do."));

        // Second reply overwrites and stays replied
        let again = MessageService::reply_to_message(&pool, created.id, "Updated answer.")
            .await
            .unwrap();
        assert_eq!(again.status, message_status::REPLIED);
        assert_eq!(again.admin_reply.as_deref(), Some("Updated answer."));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_view_never_downgrades_replied(pool: PgPool) {
        let created = MessageService::create_message(&pool, create_dto("Jordan"))
            .await
            .unwrap();
        MessageService::reply_to_message(&pool, created.id, "Yes.")
            .await
            .unwrap();

        let viewed = MessageService::get_message_by_id(&pool, created.id)
            .await
            .unwrap();
        assert_eq!(viewed.status, message_status::REPLIED);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reply_missing_message_not_found(pool: PgPool) {
        let result = MessageService::reply_to_message(&pool, Uuid::new_v4(), "Hello").await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_filters_by_status(pool: PgPool) {
        let first = MessageService::create_message(&pool, create_dto("Jordan"))
            .await
            .unwrap();
        MessageService::create_message(&pool, create_dto("Sam"))
            .await
            .unwrap();
        MessageService::reply_to_message(&pool, first.id, "Answered")
            .await
            .unwrap();

        let unread = MessageService::get_messages(
            &pool,
            MessageFilterParams {
                status: Some(message_status::UNREAD.to_string()),
                pagination: Default::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(unread.meta.total, 1);
        assert_eq!(unread.data[0].name, "Sam");
    }
}
