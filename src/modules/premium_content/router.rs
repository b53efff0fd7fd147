use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{
    create_premium_content, delete_premium_content, get_premium_content, update_premium_content,
};

pub fn init_premium_content_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_premium_content).get(get_premium_content))
        .route(
            "/{id}",
            put(update_premium_content).delete(delete_premium_content),
        )
}
