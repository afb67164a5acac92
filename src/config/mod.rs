//! Configuration management
//!
//! This module handles loading and parsing configuration for the Vitrine
//! portfolio system. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults. Secrets (the
//! session signing secret, admin credentials and the media host API secret)
//! are normally supplied through environment variables; leaving them unset
//! disables authentication rather than bypassing it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Media host configuration
    #[serde(default)]
    pub media: MediaConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path (or `:memory:`)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/vitrine.db".to_string()
}

/// Authentication configuration
///
/// Holds the symmetric signing secret for session tokens and the single
/// admin credential pair. All three are required for login to work; an
/// empty value makes the corresponding check fail closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric secret used to sign session tokens
    #[serde(default)]
    pub secret: String,
    /// Admin login email
    #[serde(default)]
    pub admin_email: String,
    /// Admin login password
    #[serde(default)]
    pub admin_password: String,
    /// Session lifetime in days
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
    /// Mark the session cookie `Secure` (enable in production behind TLS)
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            admin_email: String::new(),
            admin_password: String::new(),
            session_ttl_days: default_session_ttl_days(),
            secure_cookies: false,
        }
    }
}

fn default_session_ttl_days() -> i64 {
    7
}

impl AuthConfig {
    /// Whether every value needed for authentication is present.
    pub fn is_complete(&self) -> bool {
        !self.secret.is_empty() && !self.admin_email.is_empty() && !self.admin_password.is_empty()
    }
}

/// Media storage driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaDriver {
    /// Store uploads on the local filesystem (default)
    #[default]
    Local,
    /// Upload to a cloud media host (Cloudinary-compatible API)
    Cloud,
}

/// Media host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Storage driver
    #[serde(default)]
    pub driver: MediaDriver,
    /// Cloud account name
    #[serde(default)]
    pub cloud_name: String,
    /// Cloud API key
    #[serde(default)]
    pub api_key: String,
    /// Cloud API secret (used for request signatures)
    #[serde(default)]
    pub api_secret: String,
    /// Folder uploads are placed under
    #[serde(default = "default_media_folder")]
    pub folder: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            driver: MediaDriver::default(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: default_media_folder(),
        }
    }
}

fn default_media_folder() -> String {
    "portfolio".to_string()
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Local upload directory (used by the `local` media driver)
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Maximum file size in bytes (default: 5MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed image MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/jpg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
    ]
}

impl UploadConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file.
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern:
    /// - VITRINE_SERVER_HOST / VITRINE_SERVER_PORT / VITRINE_SERVER_CORS_ORIGIN
    /// - VITRINE_DATABASE_URL
    /// - VITRINE_AUTH_SECRET / VITRINE_ADMIN_EMAIL / VITRINE_ADMIN_PASSWORD
    /// - VITRINE_AUTH_SECURE_COOKIES
    /// - VITRINE_MEDIA_DRIVER / VITRINE_MEDIA_CLOUD_NAME / VITRINE_MEDIA_API_KEY
    ///   / VITRINE_MEDIA_API_SECRET / VITRINE_MEDIA_FOLDER
    /// - VITRINE_UPLOAD_PATH
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("VITRINE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("VITRINE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("VITRINE_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("VITRINE_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secret) = std::env::var("VITRINE_AUTH_SECRET") {
            self.auth.secret = secret;
        }
        if let Ok(email) = std::env::var("VITRINE_ADMIN_EMAIL") {
            self.auth.admin_email = email;
        }
        if let Ok(password) = std::env::var("VITRINE_ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
        if let Ok(secure) = std::env::var("VITRINE_AUTH_SECURE_COOKIES") {
            match secure.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.auth.secure_cookies = true,
                "false" | "0" | "no" => self.auth.secure_cookies = false,
                _ => {} // Ignore invalid values
            }
        }

        if let Ok(driver) = std::env::var("VITRINE_MEDIA_DRIVER") {
            match driver.to_lowercase().as_str() {
                "local" => self.media.driver = MediaDriver::Local,
                "cloud" => self.media.driver = MediaDriver::Cloud,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(cloud_name) = std::env::var("VITRINE_MEDIA_CLOUD_NAME") {
            self.media.cloud_name = cloud_name;
        }
        if let Ok(api_key) = std::env::var("VITRINE_MEDIA_API_KEY") {
            self.media.api_key = api_key;
        }
        if let Ok(api_secret) = std::env::var("VITRINE_MEDIA_API_SECRET") {
            self.media.api_secret = api_secret;
        }
        if let Ok(folder) = std::env::var("VITRINE_MEDIA_FOLDER") {
            self.media.folder = folder;
        }

        if let Ok(path) = std::env::var("VITRINE_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_host_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
                .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
            Just("localhost".to_string()),
            Just("0.0.0.0".to_string()),
            "[a-z][a-z0-9]{0,10}",
        ]
    }

    fn valid_config_strategy() -> impl Strategy<Value = Config> {
        (
            valid_host_strategy(),
            1u16..=65535,
            "[a-z][a-z0-9_/]{0,20}\\.db",
            1i64..=90,
            prop::bool::ANY,
        )
            .prop_map(|(host, port, db_url, ttl_days, secure)| Config {
                server: ServerConfig {
                    host,
                    port,
                    cors_origin: "http://localhost:3000".to_string(),
                },
                database: DatabaseConfig { url: db_url },
                auth: AuthConfig {
                    secret: "test-secret".to_string(),
                    admin_email: "admin@example.com".to_string(),
                    admin_password: "password".to_string(),
                    session_ttl_days: ttl_days,
                    secure_cookies: secure,
                },
                media: MediaConfig::default(),
                upload: UploadConfig::default(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a config to YAML and parsing it back yields an
        /// equivalent config.
        #[test]
        fn config_roundtrip(config in valid_config_strategy()) {
            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");

            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.server.host, parsed.server.host);
            prop_assert_eq!(config.server.port, parsed.server.port);
            prop_assert_eq!(config.database.url, parsed.database.url);
            prop_assert_eq!(config.auth.session_ttl_days, parsed.auth.session_ttl_days);
            prop_assert_eq!(config.auth.secure_cookies, parsed.auth.secure_cookies);
        }

        /// Partial config files always parse and fill missing values with
        /// the predefined defaults.
        #[test]
        fn config_default_filling(port in 1u16..=65535) {
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "server:\n  port: {}\n", port).expect("Failed to write config");

            let config = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.server.port, port);
            prop_assert_eq!(config.server.host, "0.0.0.0");
            prop_assert_eq!(config.auth.session_ttl_days, 7);
            prop_assert!(!config.auth.is_complete());
        }
    }
}
