use axum::{Json, extract::State};
use tracing::instrument;

use acadex_core::AppError;

use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::role::{RequireAdmin, is_admin};
use crate::modules::settings::model::{SettingsMap, UpdateSettingsDto};
use crate::modules::settings::service::SettingsService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings map; non-admin callers only see public keys")
    ),
    tag = "Settings"
)]
#[instrument(skip(state, caller))]
pub async fn get_settings(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
) -> Result<Json<SettingsMap>, AppError> {
    let admin = caller.as_ref().is_some_and(|user| is_admin(&user.0));

    let settings = SettingsService::get_settings(&state.db, admin).await?;

    Ok(Json(settings))
}

/// Upsert settings key by key.
///
/// Each key is written independently; there is no cross-key transaction, so a
/// write failure partway through leaves earlier keys updated.
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Updated settings map"),
        (status = 400, description = "Unknown key or mismatched value type"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(dto): Json<UpdateSettingsDto>,
) -> Result<Json<SettingsMap>, AppError> {
    let settings = SettingsService::update_settings(&state.db, dto.settings, true).await?;

    Ok(Json(settings))
}
