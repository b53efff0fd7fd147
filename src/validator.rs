//! JSON extraction with validation.
//!
//! [`ValidatedJson`] wraps `axum::Json` so handlers only ever see a
//! well-formed DTO: body-level failures become readable 400s and `validator`
//! derive failures become 422s carrying the per-field messages.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use acadex_core::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Map a `Json` rejection to a 400 that names the offending field where we
/// can, instead of echoing serde's internal wording at the client.
fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow::anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let detail = rejection.body_text();
    if let Some(rest) = detail.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        AppError::bad_request(anyhow::anyhow!("{} is required", field))
    } else if detail.contains("invalid type") {
        AppError::bad_request(anyhow::anyhow!("Invalid field type in request"))
    } else {
        AppError::bad_request(anyhow::anyhow!("Invalid request body"))
    }
}

fn validation_messages(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{} is invalid", field)),
            }
        }
    }
    messages.join(", ")
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::unprocessable(anyhow::anyhow!("{}", validation_messages(&errors)))
        })?;

        Ok(ValidatedJson(value))
    }
}
