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
use crate::modules::classes::model::{Class, ClassFilterParams, CreateClassDto, UpdateClassDto};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 409, description = "A class with the same slug already exists")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams),
    responses(
        (status = 200, description = "List of classes sorted by order", body = Vec<Class>)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, caller))]
pub async fn get_classes(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(filters): Query<ClassFilterParams>,
) -> Result<Json<Vec<Class>>, AppError> {
    // The `all` flag is honored for admins only; everyone else sees active rows
    let include_all = filters.all.unwrap_or(false)
        && caller.as_ref().is_some_and(|user| is_admin(&user.0));

    let classes = ClassService::get_classes(&state.db, include_all).await?;

    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class details", body = Class),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::get_class_by_id(&state.db, id).await?;

    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Class not found"),
        (status = 409, description = "Renaming collides with an existing slug")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    dto.validate().map_err(|e| {
        AppError::unprocessable(anyhow::anyhow!("{}", e))
    })?;

    let class = ClassService::update_class(&state.db, id, dto).await?;

    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 204, description = "Class deleted (courses are orphaned, not deleted)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ClassService::delete_class(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
