use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

use acadex_core::AppError;

use crate::middleware::role::RequireAdmin;
use crate::modules::messages::model::{
    CreateMessageDto, Message, MessageFilterParams, PaginatedMessagesResponse, ReplyMessageDto,
};
use crate::modules::messages::service::MessageService;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

/// Submit a contact-form message (public).
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message received", body = Message),
        (status = 400, description = "Invalid input")
    ),
    tag = "Messages"
)]
#[instrument(skip(state, dto))]
pub async fn create_message(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateMessageDto>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = MessageService::create_message(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/api/messages",
    params(MessageFilterParams),
    responses(
        (status = 200, description = "Paginated messages", body = PaginatedMessagesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_messages(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<MessageFilterParams>,
) -> Result<Json<PaginatedMessagesResponse>, AppError> {
    let messages = MessageService::get_messages(&state.db, filters).await?;

    Ok(Json(messages))
}

/// Fetch one message. The first view of an unread message marks it read.
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(
        ("id" = Uuid, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "The message", body = Message),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Message not found")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_message_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    let message = MessageService::get_message_by_id(&state.db, id).await?;

    Ok(Json(message))
}

/// Save an admin reply and notify the sender.
///
/// The status change is persisted first; the notification email is attempted
/// afterwards and its failure is logged, never surfaced — the reply has
/// already succeeded by then.
#[utoipa::path(
    put,
    path = "/api/messages/{id}",
    params(
        ("id" = Uuid, Path, description = "Message ID")
    ),
    request_body = ReplyMessageDto,
    responses(
        (status = 200, description = "Reply saved", body = Message),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Message not found")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn reply_to_message(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<ReplyMessageDto>,
) -> Result<Json<Message>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let message = MessageService::reply_to_message(&state.db, id, &dto.admin_reply).await?;

    // Best-effort notification: the reply is already persisted, so a send
    // failure is logged and never rolls the status back.
    let email_service = EmailService::new(state.email_config.clone());
    if let Err(e) = email_service
        .send_message_reply(
            &message.email,
            &message.name,
            message.subject.as_deref().unwrap_or(""),
            &dto.admin_reply,
        )
        .await
    {
        warn!(
            message.id = %message.id,
            error = %e.error,
            "Failed to send reply notification"
        );
    }

    Ok(Json(message))
}

#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(
        ("id" = Uuid, Path, description = "Message ID")
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Message not found")
    ),
    tag = "Messages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    MessageService::delete_message(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
