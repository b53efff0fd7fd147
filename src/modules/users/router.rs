use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{get_users, update_user_status};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}/status", put(update_user_status))
}
