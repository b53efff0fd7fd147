//! Role-based authorization middleware for Axum.
//!
//! Two approaches are provided:
//! 1. Layer-based middleware via [`require_admin`] for routers whose every
//!    route is admin-only
//! 2. The [`RequireAdmin`] extractor for individual handlers in mixed-tier
//!    routers

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use acadex_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{User, user_roles};
use crate::state::AppState;

/// Check whether an authenticated user holds the admin role.
pub fn is_admin(user: &User) -> bool {
    user.role == user_roles::ADMIN
}

/// Middleware that rejects non-admin callers before the handler runs.
///
/// # Usage
///
/// ```rust,ignore
/// Router::new()
///     .nest("/users", init_users_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if !is_admin(&auth_user.0) {
        return AppError::forbidden(anyhow::anyhow!(
            "Access denied. Administrator privileges required."
        ))
        .into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}

/// Extractor for admin-only handlers inside mixed-tier routers.
///
/// Authenticates the caller first (401 on failure), then checks the admin
/// role (403 on failure) — a logged-in non-admin gets a distinct response
/// from an anonymous caller.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn delete_course(
///     State(state): State<AppState>,
///     RequireAdmin(admin): RequireAdmin,
///     Path(id): Path<Uuid>,
/// ) -> Result<StatusCode, AppError> {
///     // Only admins reach this point
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if !is_admin(&auth_user.0) {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Administrator privileges required."
            )));
        }

        Ok(RequireAdmin(auth_user.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            status: "active".to_string(),
            subscribed_courses: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(is_admin(&test_user("admin")));
        assert!(!is_admin(&test_user("student")));
    }
}
