use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_appointment, delete_appointment, get_appointments, get_my_appointments,
    update_appointment_status,
};

pub fn init_appointments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment).get(get_appointments))
        .route("/my", get(get_my_appointments))
        .route(
            "/{id}",
            put(update_appointment_status).delete(delete_appointment),
        )
}
