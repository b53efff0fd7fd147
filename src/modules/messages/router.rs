use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_message, delete_message, get_message_by_id, get_messages, reply_to_message,
};

pub fn init_messages_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_message).get(get_messages))
        .route(
            "/{id}",
            get(get_message_by_id)
                .put(reply_to_message)
                .delete(delete_message),
        )
}
