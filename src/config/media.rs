use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Directory where uploaded files are written.
    pub base_dir: PathBuf,
    /// Public URL prefix under which stored files are served.
    pub base_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: usize,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self {
            base_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./media")),
            base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/media".to_string()),
            max_file_size: env::var("MEDIA_MAX_FILE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}
