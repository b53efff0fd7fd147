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
use crate::modules::material_types::model::{
    CreateMaterialTypeDto, MaterialType, MaterialTypeFilterParams, UpdateMaterialTypeDto,
};
use crate::modules::material_types::service::MaterialTypeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/material-types",
    request_body = CreateMaterialTypeDto,
    responses(
        (status = 201, description = "Material type created", body = MaterialType),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Parent course not found"),
        (status = 409, description = "A material type with the same slug exists in this course")
    ),
    tag = "Material Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_material_type(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateMaterialTypeDto>,
) -> Result<(StatusCode, Json<MaterialType>), AppError> {
    let material_type = MaterialTypeService::create_material_type(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(material_type)))
}

#[utoipa::path(
    get,
    path = "/api/material-types",
    params(MaterialTypeFilterParams),
    responses(
        (status = 200, description = "Material types of a course", body = Vec<MaterialType>),
        (status = 400, description = "course_id is required")
    ),
    tag = "Material Types"
)]
#[instrument(skip(state, caller))]
pub async fn get_material_types(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(filters): Query<MaterialTypeFilterParams>,
) -> Result<Json<Vec<MaterialType>>, AppError> {
    // A listing without a parent course is a client error, not an empty result
    let course_id = filters
        .course_id
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("course_id is required")))?;

    let include_all = filters.all.unwrap_or(false)
        && caller.as_ref().is_some_and(|user| is_admin(&user.0));

    let material_types =
        MaterialTypeService::get_material_types(&state.db, course_id, include_all).await?;

    Ok(Json(material_types))
}

#[utoipa::path(
    put,
    path = "/api/material-types/{id}",
    params(
        ("id" = Uuid, Path, description = "Material type ID")
    ),
    request_body = UpdateMaterialTypeDto,
    responses(
        (status = 200, description = "Material type updated", body = MaterialType),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Material type not found"),
        (status = 409, description = "Renaming collides with a sibling slug")
    ),
    tag = "Material Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_material_type(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateMaterialTypeDto>,
) -> Result<Json<MaterialType>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let material_type = MaterialTypeService::update_material_type(&state.db, id, dto).await?;

    Ok(Json(material_type))
}

#[utoipa::path(
    delete,
    path = "/api/material-types/{id}",
    params(
        ("id" = Uuid, Path, description = "Material type ID")
    ),
    responses(
        (status = 204, description = "Material type and its materials deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Material type not found")
    ),
    tag = "Material Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_material_type(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    MaterialTypeService::delete_material_type(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
