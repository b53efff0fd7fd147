use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{
    create_material_type, delete_material_type, get_material_types, update_material_type,
};

pub fn init_material_types_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_material_type).get(get_material_types))
        .route(
            "/{id}",
            put(update_material_type).delete(delete_material_type),
        )
}
