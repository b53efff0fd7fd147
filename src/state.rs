use std::sync::Arc;

use acadex_core::media::LocalMediaStore;
use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::config::media::MediaConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub media: Arc<LocalMediaStore>,
}

pub async fn init_app_state() -> AppState {
    let media_config = MediaConfig::from_env();

    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        media: Arc::new(LocalMediaStore::new(
            media_config.base_dir,
            media_config.base_url,
            media_config.max_file_size,
        )),
    }
}
