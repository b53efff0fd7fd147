use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use acadex_core::serde::deserialize_optional_flag;

/// A paid offering attached directly to a course, sibling to its material
/// types. The feature counts drive the pricing card on the course page.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PremiumContent {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub video_count: i32,
    pub past_paper_count: i32,
    pub quiz_count: i32,
    pub notes_count: i32,
    pub other_features: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePremiumContentDto {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    pub video_count: Option<i32>,
    pub past_paper_count: Option<i32>,
    pub quiz_count: Option<i32>,
    pub notes_count: Option<i32>,
    pub other_features: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePremiumContentDto {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
    pub video_count: Option<i32>,
    pub past_paper_count: Option<i32>,
    pub quiz_count: Option<i32>,
    pub notes_count: Option<i32>,
    pub other_features: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PremiumContentFilterParams {
    /// Parent course. Required: listing without a course is a client error.
    pub course_id: Option<Uuid>,
    /// Include inactive rows. Honored for admin callers only.
    #[serde(default, deserialize_with = "deserialize_optional_flag")]
    pub all: Option<bool>,
}
