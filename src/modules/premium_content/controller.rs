use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use acadex_core::AppError;

use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::role::{RequireAdmin, is_admin};
use crate::modules::premium_content::model::{
    CreatePremiumContentDto, PremiumContent, PremiumContentFilterParams, UpdatePremiumContentDto,
};
use crate::modules::premium_content::service::PremiumContentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/premium-content",
    request_body = CreatePremiumContentDto,
    responses(
        (status = 201, description = "Premium content created", body = PremiumContent),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Parent course not found")
    ),
    tag = "Premium Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_premium_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreatePremiumContentDto>,
) -> Result<(StatusCode, Json<PremiumContent>), AppError> {
    let premium = PremiumContentService::create_premium_content(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(premium)))
}

#[utoipa::path(
    get,
    path = "/api/premium-content",
    params(PremiumContentFilterParams),
    responses(
        (status = 200, description = "Premium content of a course", body = Vec<PremiumContent>),
        (status = 400, description = "course_id is required")
    ),
    tag = "Premium Content"
)]
#[instrument(skip(state, caller))]
pub async fn get_premium_content(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(filters): Query<PremiumContentFilterParams>,
) -> Result<Json<Vec<PremiumContent>>, AppError> {
    let course_id = filters
        .course_id
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("course_id is required")))?;

    let include_all = filters.all.unwrap_or(false)
        && caller.as_ref().is_some_and(|user| is_admin(&user.0));

    let premium =
        PremiumContentService::get_premium_content(&state.db, course_id, include_all).await?;

    Ok(Json(premium))
}

#[utoipa::path(
    put,
    path = "/api/premium-content/{id}",
    params(
        ("id" = Uuid, Path, description = "Premium content ID")
    ),
    request_body = UpdatePremiumContentDto,
    responses(
        (status = 200, description = "Premium content updated", body = PremiumContent),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Premium content not found")
    ),
    tag = "Premium Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_premium_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdatePremiumContentDto>,
) -> Result<Json<PremiumContent>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let premium = PremiumContentService::update_premium_content(&state.db, id, dto).await?;

    Ok(Json(premium))
}

#[utoipa::path(
    delete,
    path = "/api/premium-content/{id}",
    params(
        ("id" = Uuid, Path, description = "Premium content ID")
    ),
    responses(
        (status = 204, description = "Premium content deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Premium content not found")
    ),
    tag = "Premium Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_premium_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PremiumContentService::delete_premium_content(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
