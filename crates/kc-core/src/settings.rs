//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub resources: ResourceSettings,
    pub fields: FieldSettings,
    pub cache: CacheSettings,
    pub decoration: DecorationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSettings {
    pub catalog: String,
    pub mapping_extension: String,
}

impl ResourceSettings {
    /// Resource name of the mapping table for `code`.
    pub fn mapping_resource(&self, code: &str) -> String {
        format!("{code}.{}", self.mapping_extension)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSettings {
    pub declared_attribute: String,
    pub override_attribute: String,
    pub enter_refocus: bool,
    pub replay: ReplayMode,
}

/// How a decided replacement is written back into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// One synthetic backspace per removed char, one key per inserted char.
    Keystrokes,
    /// A single value write and input event.
    Bulk,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub retry_failed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecorationSettings {
    pub icon_prefix: String,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.trim().is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_non_empty!(resources.catalog);
    check_non_empty!(resources.mapping_extension);
    check_non_empty!(fields.declared_attribute);
    check_non_empty!(fields.override_attribute);

    if s
        .fields
        .declared_attribute
        .eq_ignore_ascii_case(&s.fields.override_attribute)
    {
        return Err(SettingsError::InvalidValue {
            field: "fields.override_attribute".to_string(),
            reason: "must differ from fields.declared_attribute".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.resources.catalog, "list.json");
        assert_eq!(s.resources.mapping_resource("ru"), "ru.json");
        assert_eq!(s.fields.declared_attribute, "lang");
        assert_eq!(s.fields.override_attribute, "kc-lang");
        assert!(s.fields.enter_refocus);
        assert_eq!(s.fields.replay, ReplayMode::Keystrokes);
        assert!(s.cache.retry_failed);
        assert_eq!(s.decoration.icon_prefix, "icons/32x32/flags/");
    }

    #[test]
    fn parse_bulk_replay() {
        let toml = DEFAULT_SETTINGS_TOML.replace("replay = \"keystrokes\"", "replay = \"bulk\"");
        let s = parse_settings_toml(&toml).unwrap();
        assert_eq!(s.fields.replay, ReplayMode::Bulk);
    }

    #[test]
    fn error_unknown_replay_mode() {
        let toml = DEFAULT_SETTINGS_TOML.replace("replay = \"keystrokes\"", "replay = \"typed\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_empty_attribute() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            "override_attribute = \"kc-lang\"",
            "override_attribute = \"\"",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        match err {
            SettingsError::InvalidValue { field, .. } => {
                assert_eq!(field, "fields.override_attribute");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn error_same_attributes() {
        let toml = DEFAULT_SETTINGS_TOML.replace(
            "override_attribute = \"kc-lang\"",
            "override_attribute = \"LANG\"",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("[resources]\ncatalog = \"x\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
