use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use acadex_core::serde::deserialize_optional_flag;

use crate::modules::material_types::model::MaterialType;
use crate::modules::materials::model::Material;
use crate::modules::premium_content::model::PremiumContent;

/// A course inside a class (e.g. "Chemistry" under "A Level").
///
/// `class_id` is nullable at the storage layer: deleting a class orphans its
/// courses rather than deleting them, and orphaned rows are filtered out of
/// public listings.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub class_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    pub icon: Option<String>,
    pub tags: Vec<String>,
    pub instructor: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    pub class_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    pub icon: Option<String>,
    pub tags: Option<Vec<String>>,
    pub instructor: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    pub icon: Option<String>,
    pub tags: Option<Vec<String>>,
    pub instructor: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CourseFilterParams {
    pub class_id: Option<Uuid>,
    /// Include inactive and orphaned rows. Honored for admin callers only.
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub all: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CourseDetailParams {
    /// When set, the response includes the course's active material types,
    /// materials, and premium content.
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub with_materials: Option<bool>,
}

/// Aggregate read joining a course with its active children, used by the
/// course detail page in one round trip.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseWithMaterials {
    #[serde(flatten)]
    pub course: Course,
    pub material_types: Vec<MaterialType>,
    pub materials: Vec<Material>,
    pub premium_content: Vec<PremiumContent>,
}
