use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use acadex_core::AppError;

use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::role::{RequireAdmin, is_admin};
use crate::modules::courses::model::{
    Course, CourseDetailParams, CourseFilterParams, CourseWithMaterials, CreateCourseDto,
    UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Parent class not found"),
        (status = 409, description = "A course with the same slug exists in this class")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "List of courses sorted by order", body = Vec<Course>)
    ),
    tag = "Courses"
)]
#[instrument(skip(state, caller))]
pub async fn get_courses(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let include_all = filters.all.unwrap_or(false)
        && caller.as_ref().is_some_and(|user| is_admin(&user.0));

    let courses = CourseService::get_courses(&state.db, &filters, include_all).await?;

    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        CourseDetailParams
    ),
    responses(
        (status = 200, description = "Course, optionally joined with its active materials", body = CourseWithMaterials),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
#[instrument(skip(state, caller))]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<CourseDetailParams>,
) -> Result<Response, AppError> {
    let admin = caller.as_ref().is_some_and(|user| is_admin(&user.0));

    if params.with_materials.unwrap_or(false) {
        let detail = CourseService::get_course_with_materials(&state.db, id, admin).await?;
        return Ok(Json(detail).into_response());
    }

    let course = CourseService::get_course_by_id(&state.db, id).await?;
    if !course.is_active && !admin {
        return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
    }

    Ok(Json(course).into_response())
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Renaming collides with a sibling slug")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let course = CourseService::update_course(&state.db, id, dto).await?;

    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course and all dependent rows deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/subscribe",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Subscribed (idempotent)"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn subscribe_to_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CourseService::subscribe(&state.db, id, auth_user.user_id()).await?;

    Ok(StatusCode::NO_CONTENT)
}
