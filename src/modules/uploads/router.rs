use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::upload_file;

pub fn init_uploads_router() -> Router<AppState> {
    Router::new().route("/", post(upload_file))
}
