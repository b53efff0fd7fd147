//! User data models and DTOs.
//!
//! Users are either students (self-registered through the public site) or
//! admins (bootstrapped via the CLI). The `status` field drives suspension:
//! suspended accounts are rejected at login and on every authenticated
//! request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use acadex_core::PaginationMeta;

/// A user account. The password hash never leaves the database layer — row
/// structs that need it are private to the auth service.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub subscribed_courses: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role values stored in `users.role`.
pub mod user_roles {
    pub const ADMIN: &str = "admin";
    pub const STUDENT: &str = "student";
}

/// Status values stored in `users.status`.
pub mod user_status {
    pub const ACTIVE: &str = "active";
    pub const SUSPENDED: &str = "suspended";
}

/// Account status as accepted by the admin status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => user_status::ACTIVE,
            Self::Suspended => user_status::SUSPENDED,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserStatusDto {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilterParams {
    pub role: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: acadex_core::PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}
