use serde::Serialize;
use utoipa::ToSchema;

/// Reference to a stored file, persisted by callers alongside the entity the
/// upload belongs to (course thumbnail, material file).
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL under which the file is served.
    pub url: String,
    /// Storage key, kept so the file can be deleted later.
    pub public_id: String,
}
