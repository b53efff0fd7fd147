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
use crate::modules::materials::model::{
    CreateMaterialDto, Material, MaterialFilterParams, UpdateMaterialDto,
};
use crate::modules::materials::service::MaterialService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = CreateMaterialDto,
    responses(
        (status = 201, description = "Material created", body = Material),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Parent material type not found")
    ),
    tag = "Materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateMaterialDto>,
) -> Result<(StatusCode, Json<Material>), AppError> {
    let material = MaterialService::create_material(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(material)))
}

#[utoipa::path(
    get,
    path = "/api/materials",
    params(MaterialFilterParams),
    responses(
        (status = 200, description = "Materials of a material type or course", body = Vec<Material>),
        (status = 400, description = "material_type_id or course_id is required")
    ),
    tag = "Materials"
)]
#[instrument(skip(state, caller))]
pub async fn get_materials(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(filters): Query<MaterialFilterParams>,
) -> Result<Json<Vec<Material>>, AppError> {
    let include_all = filters.all.unwrap_or(false)
        && caller.as_ref().is_some_and(|user| is_admin(&user.0));

    let materials = MaterialService::get_materials(
        &state.db,
        filters.material_type_id,
        filters.course_id,
        include_all,
    )
    .await?;

    Ok(Json(materials))
}

#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    request_body = UpdateMaterialDto,
    responses(
        (status = 200, description = "Material updated", body = Material),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Material not found")
    ),
    tag = "Materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateMaterialDto>,
) -> Result<Json<Material>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let material = MaterialService::update_material(&state.db, id, dto).await?;

    Ok(Json(material))
}

#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 204, description = "Material deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Material not found")
    ),
    tag = "Materials",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    MaterialService::delete_material(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
