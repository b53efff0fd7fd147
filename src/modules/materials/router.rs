use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{create_material, delete_material, get_materials, update_material};

pub fn init_materials_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_material).get(get_materials))
        .route("/{id}", put(update_material).delete(delete_material))
}
