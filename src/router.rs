use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::require_admin;
use crate::modules::appointments::router::init_appointments_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::material_types::router::init_material_types_router;
use crate::modules::materials::router::init_materials_router;
use crate::modules::messages::router::init_messages_router;
use crate::modules::premium_content::router::init_premium_content_router;
use crate::modules::settings::router::init_settings_router;
use crate::modules::stats::router::init_stats_router;
use crate::modules::uploads::router::init_uploads_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                // Mixed-tier routers: public reads, admin mutations guarded
                // per handler via the RequireAdmin extractor
                .nest("/classes", init_classes_router())
                .nest("/courses", init_courses_router())
                .nest("/material-types", init_material_types_router())
                .nest("/materials", init_materials_router())
                .nest("/premium-content", init_premium_content_router())
                .nest("/settings", init_settings_router())
                .nest("/messages", init_messages_router())
                .nest("/appointments", init_appointments_router())
                .nest("/uploads", init_uploads_router())
                // Admin-only routers take the layer wholesale
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/stats",
                    init_stats_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
