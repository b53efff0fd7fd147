//! Media storage abstraction.
//!
//! Uploaded files (course thumbnails, study materials) are persisted through
//! the [`MediaStorage`] trait so the hosting backend can be swapped without
//! touching handler logic. [`LocalMediaStore`] keeps files on the local
//! filesystem and serves them under a configurable public URL; the production
//! media host implements the same seam.
//!
//! An upload is a single synchronous call: if it fails, the enclosing request
//! fails and no reference to the file is persisted anywhere.

use std::fmt;
use std::path::PathBuf;
use tokio::fs;

/// Abstract trait for media storage backends.
pub trait MediaStorage: Send + Sync {
    /// Persist file content under `key` and return the key as the stored
    /// file's public id.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, MediaError>> + Send + 'a>>;

    /// Delete a file by its public id. Deleting a missing file is not an
    /// error.
    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), MediaError>> + Send + 'a>>;

    /// Public URL under which the stored file is reachable.
    fn url(&self, key: &str) -> Result<String, MediaError>;
}

/// Error type for media storage operations.
#[derive(Debug)]
pub enum MediaError {
    /// File exceeds maximum allowed size.
    TooLarge { max_bytes: usize },

    /// Content type not allowed.
    UnsupportedType { received: String },

    /// I/O error from the backing store.
    Io(std::io::Error),

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::UnsupportedType { received } => {
                write!(f, "Content type '{}' is not allowed", received)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for MediaError {}

impl From<std::io::Error> for MediaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Local filesystem media store.
#[derive(Clone)]
pub struct LocalMediaStore {
    /// Base directory where files are stored
    base_dir: PathBuf,

    /// Base URL for public access (e.g., "http://localhost:3000/media")
    base_url: String,

    /// Maximum file size in bytes
    max_file_size: usize,

    /// Allowed content types for uploads
    allowed_content_types: Vec<String>,
}

impl LocalMediaStore {
    pub fn new(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_content_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
                "application/pdf".to_string(),
            ],
        }
    }

    /// Check an incoming content type against the allow list.
    pub fn check_content_type(&self, content_type: &str) -> Result<(), MediaError> {
        if self
            .allowed_content_types
            .iter()
            .any(|t| t == content_type)
        {
            Ok(())
        } else {
            Err(MediaError::UnsupportedType {
                received: content_type.to_string(),
            })
        }
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), MediaError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(MediaError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(MediaError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl MediaStorage for LocalMediaStore {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, MediaError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(MediaError::TooLarge {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);

            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), MediaError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);

            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn url(&self, key: &str) -> Result<String, MediaError> {
        Self::validate_key(key)?;

        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}
