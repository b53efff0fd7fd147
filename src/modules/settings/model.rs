//! Settings data models.
//!
//! Site configuration is a flat key/value collection. Values are typed
//! (string, bool, or number) rather than stored as opaque strings, and every
//! key must appear in the [`KNOWN_SETTINGS`] registry with its expected kind.
//! Visibility is per key: admins read every key, everyone else only sees the
//! keys flagged public in the registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A typed setting value, stored as jsonb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl SettingValue {
    /// Interpret a raw jsonb value read from storage. Shapes outside the
    /// registry's three kinds (arrays, objects, null) yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::json!(n),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Bool(_) => SettingKind::Bool,
            Self::Number(_) => SettingKind::Number,
            Self::String(_) => SettingKind::String,
        }
    }
}

/// Expected value kind for a registered setting key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    String,
    Bool,
    Number,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Number => "number",
        }
    }
}

/// A registered setting key: its expected kind and whether non-admin callers
/// may read it.
pub struct SettingSpec {
    pub key: &'static str,
    pub kind: SettingKind,
    pub public: bool,
}

const fn spec(key: &'static str, kind: SettingKind, public: bool) -> SettingSpec {
    SettingSpec { key, kind, public }
}

/// Every key the settings store accepts. Writes against keys outside this
/// registry, or with a mismatched value kind, are rejected.
///
/// The `public` column is the non-admin allow-list: contact info, the
/// announcement banner, social links, and branding. Everything else is
/// admin-only and silently absent from public reads.
pub const KNOWN_SETTINGS: &[SettingSpec] = &[
    // Branding
    spec("academy_name", SettingKind::String, true),
    spec("academy_tagline", SettingKind::String, true),
    spec("academy_logo_url", SettingKind::String, true),
    // Contact info
    spec("contact_email", SettingKind::String, true),
    spec("contact_phone", SettingKind::String, true),
    spec("contact_address", SettingKind::String, true),
    spec("contact_whatsapp", SettingKind::String, true),
    // Announcement banner
    spec("announcement_enabled", SettingKind::Bool, true),
    spec("announcement_text", SettingKind::String, true),
    // Social links
    spec("social_facebook", SettingKind::String, true),
    spec("social_instagram", SettingKind::String, true),
    spec("social_youtube", SettingKind::String, true),
    spec("social_tiktok", SettingKind::String, true),
    // Admin-only operational toggles
    spec("appointments_enabled", SettingKind::Bool, false),
    spec("registration_enabled", SettingKind::Bool, false),
    spec("appointment_slot_minutes", SettingKind::Number, false),
    spec("notify_email", SettingKind::String, false),
];

/// Look up a key in the registry.
pub fn setting_spec(key: &str) -> Option<&'static SettingSpec> {
    KNOWN_SETTINGS.iter().find(|s| s.key == key)
}

/// Settings response and update payload: a flat key → value map. BTreeMap
/// keeps responses in a stable key order.
pub type SettingsMap = BTreeMap<String, SettingValue>;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsDto {
    #[serde(flatten)]
    pub settings: SettingsMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialization() {
        let v: SettingValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, SettingValue::Bool(true));
        let v: SettingValue = serde_json::from_str("30").unwrap();
        assert_eq!(v, SettingValue::Number(30.0));
        let v: SettingValue = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(v, SettingValue::String("hello".to_string()));
    }

    #[test]
    fn test_from_json_rejects_compound_shapes() {
        assert!(SettingValue::from_json(&serde_json::json!(["a"])).is_none());
        assert!(SettingValue::from_json(&serde_json::json!({"k": 1})).is_none());
        assert!(SettingValue::from_json(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let v = SettingValue::Number(12.5);
        assert_eq!(SettingValue::from_json(&v.to_json()), Some(v));
    }

    #[test]
    fn test_registry_lookup() {
        let spec = setting_spec("contact_email").unwrap();
        assert!(spec.public);
        assert_eq!(spec.kind, SettingKind::String);

        let spec = setting_spec("registration_enabled").unwrap();
        assert!(!spec.public);

        assert!(setting_spec("no_such_key").is_none());
    }
}
