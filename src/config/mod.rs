use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const PRODUCTION_API_URL: &str = "https://pantrypal-backend.onrender.com";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless configured; a hung request blocks its caller.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("development") | Ok("dev") => Environment::Development,
            _ => Environment::Production,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PANTRY_API_URL") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                self.api.base_url = trimmed.to_string();
            }
        }
        if let Ok(v) = env::var("PANTRY_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = parse_timeout_secs(&v);
        }
        if let Ok(v) = env::var("PANTRY_CONFIG_DIR") {
            self.storage.config_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("PANTRY_DEBUG_LOGGING") {
            self.logging.debug_logging = parse_flag(&v).unwrap_or(self.logging.debug_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEVELOPMENT_API_URL.to_string(),
                request_timeout_secs: None,
            },
            storage: StorageConfig { config_dir: None },
            logging: LoggingConfig { debug_logging: true },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: PRODUCTION_API_URL.to_string(),
                request_timeout_secs: None,
            },
            storage: StorageConfig { config_dir: None },
            logging: LoggingConfig { debug_logging: false },
        }
    }
}

/// Positive whole seconds; zero or garbage means no timeout.
fn parse_timeout_secs(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
