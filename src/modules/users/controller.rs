use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use acadex_core::AppError;

use crate::modules::users::model::{
    PaginatedUsersResponse, UpdateUserStatusDto, User, UserFilterParams,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Paginated list of users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let users = UserService::get_users(&state.db, filters).await?;

    Ok(Json(users))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/status",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserStatusDto,
    responses(
        (status = 200, description = "User status updated", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_user_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateUserStatusDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_status(&state.db, id, dto).await?;

    Ok(Json(user))
}
