use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use acadex_core::serde::deserialize_optional_flag;

/// A study material file (notes PDF, past paper, worksheet) inside a
/// material type. `course_id` duplicates the parent type's course so
/// course-wide listings don't need a join.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Material {
    pub id: Uuid,
    pub material_type_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_public_id: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaterialDto {
    pub material_type_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_public_id: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterialDto {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_public_id: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct MaterialFilterParams {
    /// Parent material type. One of material_type_id / course_id is required.
    pub material_type_id: Option<Uuid>,
    /// Parent course, for course-wide listings.
    pub course_id: Option<Uuid>,
    /// Include inactive rows. Honored for admin callers only.
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub all: Option<bool>,
}
