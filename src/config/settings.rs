//! User settings for Libro
//!
//! Manages user preferences including display formats, backup retention,
//! and the endpoints of the optional hosted services.

use serde::{Deserialize, Serialize};

use super::paths::LibroPaths;
use crate::error::LibroError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// Generative-model assistant settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Model name used for every call
    #[serde(default = "default_model")]
    pub model: String,

    /// API root, without the version segment
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_assistant_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Hosted authentication settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CloudSettings {
    /// Supabase project URL (e.g. `https://xyz.supabase.co`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,

    /// Public anon key of the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_anon_key: Option<String>,
}

/// User settings for Libro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name shown in report headers
    #[serde(default)]
    pub business_name: String,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Days ahead considered "upcoming" for tax due dates
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: i64,

    #[serde(default)]
    pub assistant: AssistantSettings,

    #[serde(default)]
    pub cloud: CloudSettings,

    /// Whether initial setup has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_upcoming_days() -> i64 {
    30
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_assistant_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            business_name: String::new(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            backup_retention: BackupRetention::default(),
            upcoming_days: default_upcoming_days(),
            assistant: AssistantSettings::default(),
            cloud: CloudSettings::default(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LibroPaths) -> Result<Self, LibroError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LibroError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LibroError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LibroPaths) -> Result<(), LibroError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LibroError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LibroError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Supabase URL, preferring `LIBRO_SUPABASE_URL`
    pub fn supabase_url(&self) -> Option<String> {
        env_non_empty("LIBRO_SUPABASE_URL").or_else(|| self.cloud.supabase_url.clone())
    }

    /// Supabase anon key, preferring `LIBRO_SUPABASE_ANON_KEY`
    pub fn supabase_anon_key(&self) -> Option<String> {
        env_non_empty("LIBRO_SUPABASE_ANON_KEY").or_else(|| self.cloud.supabase_anon_key.clone())
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.backup_retention.daily_count, 30);
        assert_eq!(settings.backup_retention.monthly_count, 12);
        assert_eq!(settings.assistant.model, "gemini-2.0-flash");
        assert!(settings.cloud.supabase_url.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.business_name = "Panadería Sol".into();
        settings.assistant.timeout_secs = 10;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.business_name, "Panadería Sol");
        assert_eq!(loaded.assistant.timeout_secs, 10);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"business_name": "X"}"#).unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.upcoming_days, 30);
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }
}
