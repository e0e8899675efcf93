use crate::listings::domain::TransactionType;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub preferences_path: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let preferences_path = env::var("APP_PREFERENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("search-preferences.json"));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            preferences_path,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Visitor-intent defaults carried across sessions. Loaded once at startup and
/// written back whenever a value changes; nothing reads the store lazily.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPreferences {
    #[serde(default)]
    pub preferred_transaction: Option<TransactionType>,
}

/// Persistence seam for [`SearchPreferences`] so the search pipeline stays
/// testable without touching the filesystem.
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<Option<SearchPreferences>, PreferenceStoreError>;
    fn save(&self, preferences: &SearchPreferences) -> Result<(), PreferenceStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceStoreError {
    #[error("preference store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// JSON file store. A missing file means "no preferences yet", not an error.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Result<Option<SearchPreferences>, PreferenceStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let preferences = serde_json::from_str(&raw)?;
        Ok(Some(preferences))
    }

    fn save(&self, preferences: &SearchPreferences) -> Result<(), PreferenceStoreError> {
        let raw = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory store for tests and the CLI paths that never persist.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    slot: Mutex<Option<SearchPreferences>>,
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> Result<Option<SearchPreferences>, PreferenceStoreError> {
        Ok(*self.slot.lock().unwrap_or_else(|poison| poison.into_inner()))
    }

    fn save(&self, preferences: &SearchPreferences) -> Result<(), PreferenceStoreError> {
        *self.slot.lock().unwrap_or_else(|poison| poison.into_inner()) = Some(*preferences);
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_PREFERENCES_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(
            config.preferences_path,
            PathBuf::from("search-preferences.json")
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn missing_preference_file_loads_as_none() {
        let store = JsonPreferenceStore::new("/definitely/not/here/prefs.json");
        assert!(store.load().expect("missing file is not an error").is_none());
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemoryPreferenceStore::default();
        let preferences = SearchPreferences {
            preferred_transaction: Some(TransactionType::Rent),
        };
        store.save(&preferences).expect("save succeeds");
        assert_eq!(store.load().expect("load succeeds"), Some(preferences));
    }
}
