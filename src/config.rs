use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::env;

use crate::models::Locale;

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    // Populated from the .env file
    pub database_path: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub session_secret_key: String,
    pub admin_url_prefix: String,
    pub use_secure_cookies: bool,
    pub default_locale: String,
}

impl Config {
    /// Loads `.env`, validates the secrets it must carry and layers them over
    /// `config/default.toml`.
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path).map_err(|e| {
            config::ConfigError::Message(format!("Cannot read env file '{}': {}", env_path.display(), e))
        })?;

        let database_path = required_var("DATABASE_PATH")?;
        let session_secret_key = required_var("SESSION_SECRET_KEY")?;
        let admin_url_prefix = required_var("ADMIN_URL_PREFIX")?;
        validate_session_key(&session_secret_key)?;
        validate_admin_prefix(&admin_url_prefix)?;
        validate_database_path(&database_path)?;

        let default_locale = optional_var("DEFAULT_LOCALE", "en");
        if Locale::from_code(&default_locale).is_none() {
            return Err(config::ConfigError::Message(format!(
                "DEFAULT_LOCALE must be 'en' or 'ur', got '{}'.", default_locale
            )));
        }
        let use_secure_cookies = optional_var("USE_SECURE_COOKIES", "false").parse::<bool>().unwrap_or(false);

        config::Config::builder()
            // [web] host and port
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_override("database_path", database_path)?
            .set_override("session_secret_key", session_secret_key)?
            .set_override("admin_url_prefix", admin_url_prefix)?
            .set_override("allowed_origins", optional_var("ALLOWED_ORIGINS", ""))?
            .set_override("log_level", optional_var("LOG_LEVEL", "info"))?
            .set_override("use_secure_cookies", use_secure_cookies)?
            .set_override("default_locale", default_locale)?
            .build()?
            .try_deserialize()
    }

    /// SQLite file holding the four content tables and the operator accounts.
    pub fn content_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("content")
            .join("content.db")
    }

    /// redb file holding contact messages and newsletter subscribers.
    pub fn inbox_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("inbox")
            .join("inbox.db")
    }

    pub fn admin_base_url(&self) -> String {
        format!("/management/{}", self.admin_url_prefix)
    }

    pub fn locale(&self) -> Locale {
        Locale::from_code(&self.default_locale).unwrap_or_default()
    }
}

fn required_var(name: &str) -> Result<String, config::ConfigError> {
    env::var(name).map_err(|_| config::ConfigError::Message(format!("{} is missing from the env file.", name)))
}

fn optional_var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// The key must be 128 hex characters (64 bytes) for the cookie session store.
pub fn validate_session_key(key: &str) -> Result<(), config::ConfigError> {
    if key.len() != 128 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(config::ConfigError::Message(
            "SESSION_SECRET_KEY must be exactly 128 hex characters.".to_string()
        ));
    }
    Ok(())
}

pub fn validate_admin_prefix(prefix: &str) -> Result<(), config::ConfigError> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(config::ConfigError::Message(format!(
            "ADMIN_URL_PREFIX '{}' is invalid. Use letters, digits, '_' or '-'.", prefix
        )));
    }
    Ok(())
}

pub fn validate_database_path(path: &str) -> Result<(), config::ConfigError> {
    if Path::new(path).is_relative() {
        return Err(config::ConfigError::Message(format!(
            "DATABASE_PATH must be absolute, got '{}'.", path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_must_be_128_hex_chars() {
        assert!(validate_session_key(&"ab".repeat(64)).is_ok());
        assert!(validate_session_key(&"ab".repeat(32)).is_err());
        assert!(validate_session_key(&"zz".repeat(64)).is_err());
    }

    #[test]
    fn admin_prefix_rejects_slashes_and_empty() {
        assert!(validate_admin_prefix("masjid-admin_1").is_ok());
        assert!(validate_admin_prefix("").is_err());
        assert!(validate_admin_prefix("a/b").is_err());
    }

    #[test]
    fn database_path_must_be_absolute() {
        assert!(validate_database_path("/var/lib/masjid").is_ok());
        assert!(validate_database_path("data/masjid").is_err());
    }
}
