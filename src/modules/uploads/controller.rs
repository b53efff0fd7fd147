use axum::{Json, extract::Multipart, extract::State};
use tracing::instrument;
use uuid::Uuid;

use acadex_core::AppError;
use acadex_core::media::{MediaError, MediaStorage};

use crate::middleware::auth::AuthUser;
use crate::modules::uploads::model::UploadResponse;
use crate::state::AppState;

/// File extension for the stored key, taken from the client's file name when
/// it looks sane, otherwise from the content type.
fn file_extension(file_name: Option<&str>, content_type: &str) -> &'static str {
    if let Some(name) = file_name
        && let Some(ext) = name.rsplit_once('.').map(|(_, ext)| ext)
    {
        match ext.to_lowercase().as_str() {
            "png" => return "png",
            "jpg" | "jpeg" => return "jpg",
            "webp" => return "webp",
            "pdf" => return "pdf",
            _ => {}
        }
    }
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "pdf",
    }
}

fn media_error(e: MediaError) -> AppError {
    match e {
        MediaError::TooLarge { .. }
        | MediaError::UnsupportedType { .. }
        | MediaError::InvalidKey(_) => AppError::bad_request(anyhow::anyhow!("{}", e)),
        MediaError::Io(_) => AppError::internal(anyhow::anyhow!("{}", e)),
    }
}

/// Upload a file to the media store.
///
/// A single synchronous call: if storage fails, the request fails and no
/// reference to the file exists anywhere. The returned url/public_id pair is
/// what course thumbnails and material files persist.
#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file field, unsupported type, or file too large"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<(axum::http::StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("File content type is required")))?
            .to_string();
        state
            .media
            .check_content_type(&content_type)
            .map_err(media_error)?;

        let extension = file_extension(field.file_name(), &content_type);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;

        let key = format!("uploads/{}.{}", Uuid::new_v4(), extension);
        let public_id = state.media.save(&key, &data).await.map_err(media_error)?;
        let url = state.media.url(&public_id).map_err(media_error)?;

        return Ok((
            axum::http::StatusCode::CREATED,
            Json(UploadResponse { url, public_id }),
        ));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "A 'file' field is required"
    )))
}
