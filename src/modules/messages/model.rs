//! Contact-form message models.
//!
//! Messages move through `unread -> read -> replied`. The first admin view
//! flips unread to read; saving a reply stamps replied (and re-stamps it on a
//! second reply). Nothing ever transitions back to unread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use acadex_core::{PaginationMeta, PaginationParams};

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub admin_reply: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status values stored in `messages.status`.
pub mod message_status {
    pub const UNREAD: &str = "unread";
    pub const READ: &str = "read";
    pub const REPLIED: &str = "replied";
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessageDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplyMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Reply is required"))]
    pub admin_reply: String,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct MessageFilterParams {
    /// Filter by lifecycle status (unread, read, replied).
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedMessagesResponse {
    pub data: Vec<Message>,
    pub meta: PaginationMeta,
}
