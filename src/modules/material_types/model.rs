use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use acadex_core::serde::deserialize_optional_flag;

/// Grouping of materials inside a course (e.g. "Past Papers", "Notes").
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaterialType {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaterialTypeDto {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterialTypeDto {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct MaterialTypeFilterParams {
    /// Parent course. Required: listing without a course is a client error.
    pub course_id: Option<Uuid>,
    /// Include inactive rows. Honored for admin callers only.
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub all: Option<bool>,
}
