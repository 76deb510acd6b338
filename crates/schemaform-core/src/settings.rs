//! Settings for a schemaform application.
//!
//! [`FormSettings`] holds everything the shell around the core needs: where
//! the schema comes from, where the store document lives, and how to log.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The default persistence key of the store document.
pub const DEFAULT_STORE_KEY: &str = "form-data";

/// The complete set of application settings.
///
/// # Examples
///
/// ```
/// use schemaform_core::settings::FormSettings;
///
/// let settings = FormSettings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.store_key, "form-data");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The heading shown above the form.
    pub title: String,

    // ── Schema ───────────────────────────────────────────────────────

    /// Path to a JSON schema file. `None` uses the built-in loan schema.
    pub schema_path: Option<PathBuf>,

    // ── Store ────────────────────────────────────────────────────────

    /// The key under which the store document is persisted.
    pub store_key: String,
    /// Directory for the file store. `None` keeps the store in memory.
    pub store_dir: Option<PathBuf>,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            debug: true,
            title: "Loan Information".to_string(),
            schema_path: None,
            store_key: DEFAULT_STORE_KEY.to_string(),
            store_dir: None,
            log_level: "info".to_string(),
        }
    }
}
