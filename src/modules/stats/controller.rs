use axum::{Json, extract::State};
use tracing::instrument;

use acadex_core::AppError;

use crate::modules::stats::model::StatsResponse;
use crate::modules::stats::service::StatsService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard counts and recent activity", body = StatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Stats",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = StatsService::get_stats(&state.db).await?;

    Ok(Json(stats))
}
