use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use uuid::Uuid;

use acadex_core::AppError;

use crate::modules::users::model::{User, user_status};
use crate::state::AppState;
use crate::utils::jwt::verify_token;

/// Name of the session cookie set on login, used as a fallback when no
/// bearer header is present.
pub const SESSION_COOKIE: &str = "acadex_token";

/// Extractor that resolves the caller's token to a live account.
///
/// Resolution prefers an `Authorization: Bearer` header and falls back to the
/// session cookie. The token's claims are never trusted on their own: the
/// account is re-loaded on every request, so a user suspended after the token
/// was issued is rejected immediately.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Pull a token out of the request: bearer header first, cookie second.
fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string());

    if bearer.is_some() {
        return bearer;
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Missing authentication token"))
        })?;

        let claims = verify_token(&token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, status, subscribed_courses, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Account no longer exists")))?;

        if user.status == user_status::SUSPENDED {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Account is suspended"
            )));
        }

        Ok(AuthUser(user))
    }
}

/// Optional variant of [`AuthUser`] for public endpoints that personalize
/// behavior when a valid session is present.
///
/// A missing, malformed, expired, or suspended token degrades to `None` —
/// public endpoints fail open to anonymous, never to an error.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
