//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (deep-merged over the defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `SCHEMAFORM_DEBUG` | `debug` |
//! | `SCHEMAFORM_LOG_LEVEL` | `log_level` |
//! | `SCHEMAFORM_TITLE` | `title` |
//! | `SCHEMAFORM_STORE_KEY` | `store_key` |
//! | `SCHEMAFORM_STORE_DIR` | `store_dir` |
//! | `SCHEMAFORM_SCHEMA_PATH` | `schema_path` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use schemaform_core::settings_loader;
//!
//! let settings = settings_loader::from_file_with_env("schemaform.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::FormError;
use crate::settings::FormSettings;

/// Loads settings from a TOML string.
///
/// Any keys not present in the TOML keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<FormSettings, FormError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a JSON string.
///
/// Any keys not present in the JSON keep their default values.
pub fn from_json_str(json_str: &str) -> Result<FormSettings, FormError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a file, choosing the format by extension.
///
/// Files ending in `.json` are read as JSON; everything else as TOML.
pub fn from_file(path: impl AsRef<Path>) -> Result<FormSettings, FormError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        FormError::ConfigurationError(format!(
            "Failed to read settings file '{}': {e}",
            path.display()
        ))
    })?;

    if path.extension().is_some_and(|ext| ext == "json") {
        from_json_str(&content)
    } else {
        from_toml_str(&content)
    }
}

/// Loads settings from a file and then applies environment variable overrides.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<FormSettings, FormError> {
    let mut settings = from_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> FormSettings {
    let mut settings = FormSettings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `SCHEMAFORM_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut FormSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

fn apply_overrides(settings: &mut FormSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("SCHEMAFORM_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = var("SCHEMAFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = var("SCHEMAFORM_TITLE") {
        settings.title = val;
    }

    if let Some(val) = var("SCHEMAFORM_STORE_KEY") {
        if !val.is_empty() {
            settings.store_key = val;
        }
    }

    if let Some(val) = var("SCHEMAFORM_STORE_DIR") {
        settings.store_dir = non_empty_path(val);
    }

    if let Some(val) = var("SCHEMAFORM_SCHEMA_PATH") {
        settings.schema_path = non_empty_path(val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn non_empty_path(val: String) -> Option<PathBuf> {
    if val.is_empty() {
        None
    } else {
        Some(PathBuf::from(val))
    }
}

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<FormSettings, FormError> {
    let default_json = serde_json::to_value(FormSettings::default()).map_err(|e| {
        FormError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
