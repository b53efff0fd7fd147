use sqlx::PgPool;
use tracing::{instrument, warn};

use acadex_core::AppError;

use crate::modules::settings::model::{SettingValue, SettingsMap, setting_spec};

pub struct SettingsService;

impl SettingsService {
    /// Read the settings map. Non-admin callers only receive keys flagged
    /// public in the registry; everything else is simply absent from the
    /// result, not redacted.
    #[instrument(skip(db))]
    pub async fn get_settings(db: &PgPool, admin: bool) -> Result<SettingsMap, AppError> {
        let rows = sqlx::query_as::<_, (String, serde_json::Value)>(
            "SELECT key, value FROM settings ORDER BY key ASC",
        )
        .fetch_all(db)
        .await?;

        let mut settings = SettingsMap::new();
        for (key, raw) in rows {
            let Some(spec) = setting_spec(&key) else {
                // Rows written before a key was retired from the registry
                warn!(setting.key = %key, "Skipping unregistered settings row");
                continue;
            };
            if !admin && !spec.public {
                continue;
            }
            match SettingValue::from_json(&raw) {
                Some(value) => {
                    settings.insert(key, value);
                }
                None => {
                    warn!(setting.key = %key, "Skipping settings row with malformed value");
                }
            }
        }

        Ok(settings)
    }

    /// Upsert settings key by key. Each write is independent: an error on one
    /// key aborts the loop but leaves earlier keys updated. Unknown keys and
    /// kind mismatches are rejected before any write happens, so validation
    /// failures never leave a partial update behind.
    #[instrument(skip(db, updates), fields(settings.count = updates.len()))]
    pub async fn update_settings(
        db: &PgPool,
        updates: SettingsMap,
        admin: bool,
    ) -> Result<SettingsMap, AppError> {
        if updates.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "At least one setting is required"
            )));
        }

        for (key, value) in &updates {
            let spec = setting_spec(key).ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!("Unknown setting key: {}", key))
            })?;
            if value.kind() != spec.kind {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Setting {} expects a {} value",
                    key,
                    spec.kind.as_str()
                )));
            }
        }

        for (key, value) in &updates {
            sqlx::query(
                "INSERT INTO settings (key, value) VALUES ($1, $2)
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            )
            .bind(key)
            .bind(value.to_json())
            .execute(db)
            .await?;
        }

        Self::get_settings(db, admin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, SettingValue)]) -> SettingsMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upsert_then_read(pool: PgPool) {
        let updates = map(&[
            ("contact_email", SettingValue::String("hi@acadex.academy".into())),
            ("announcement_enabled", SettingValue::Bool(true)),
        ]);

        let settings = SettingsService::update_settings(&pool, updates, true)
            .await
            .unwrap();

        assert_eq!(
            settings.get("contact_email"),
            Some(&SettingValue::String("hi@acadex.academy".into()))
        );
        assert_eq!(
            settings.get("announcement_enabled"),
            Some(&SettingValue::Bool(true))
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upsert_overwrites_unconditionally(pool: PgPool) {
        SettingsService::update_settings(
            &pool,
            map(&[("contact_phone", SettingValue::String("111".into()))]),
            true,
        )
        .await
        .unwrap();

        let settings = SettingsService::update_settings(
            &pool,
            map(&[("contact_phone", SettingValue::String("222".into()))]),
            true,
        )
        .await
        .unwrap();

        assert_eq!(
            settings.get("contact_phone"),
            Some(&SettingValue::String("222".into()))
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_key_rejected_before_any_write(pool: PgPool) {
        let updates = map(&[
            ("contact_email", SettingValue::String("hi@acadex.academy".into())),
            ("not_a_real_key", SettingValue::Bool(true)),
        ]);

        let result = SettingsService::update_settings(&pool, updates, true).await;
        assert!(result.is_err());

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_kind_mismatch_rejected(pool: PgPool) {
        let result = SettingsService::update_settings(
            &pool,
            map(&[("announcement_enabled", SettingValue::String("yes".into()))]),
            true,
        )
        .await;

        assert!(result.is_err());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_public_read_omits_admin_only_keys(pool: PgPool) {
        SettingsService::update_settings(
            &pool,
            map(&[
                ("contact_email", SettingValue::String("hi@acadex.academy".into())),
                ("registration_enabled", SettingValue::Bool(false)),
            ]),
            true,
        )
        .await
        .unwrap();

        let public = SettingsService::get_settings(&pool, false).await.unwrap();
        assert!(public.contains_key("contact_email"));
        assert!(!public.contains_key("registration_enabled"));

        let admin = SettingsService::get_settings(&pool, true).await.unwrap();
        assert!(admin.contains_key("registration_enabled"));
    }
}
