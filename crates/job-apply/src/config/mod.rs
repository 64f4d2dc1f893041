use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the client.
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

/// Top-level configuration for the application client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub wizard: WizardConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = normalize_api_url(
            &env::var("APPLY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        )?;

        let timeout_secs = parse_u64("APPLY_API_TIMEOUT_SECS", 30)?;
        let redirect_delay_ms = parse_u64("APPLY_REDIRECT_DELAY_MS", 1500)?;

        let store_path = env::var("APPLY_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            wizard: WizardConfig {
                redirect_delay: Duration::from_millis(redirect_delay_ms),
                store_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_STORE_PATH: &str = "job-apply-store.json";

/// Trim whitespace and trailing slashes, rejecting anything that is not http(s).
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let base_url = raw.trim().trim_end_matches('/').to_string();
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(base_url)
    } else {
        Err(ConfigError::InvalidApiUrl(base_url))
    }
}

fn parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling how the backend is reached.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Wizard behavior that is not tied to a particular backend.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub redirect_delay: Duration,
    pub store_path: PathBuf,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            redirect_delay: Duration::from_millis(1500),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl(String),
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl(value) => {
                write!(f, "APPLY_API_URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

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
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APPLY_API_URL");
        env::remove_var("APPLY_API_TIMEOUT_SECS");
        env::remove_var("APPLY_REDIRECT_DELAY_MS");
        env::remove_var("APPLY_STORE_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.wizard.redirect_delay, Duration::from_millis(1500));
        assert_eq!(
            config.wizard.store_path,
            PathBuf::from("job-apply-store.json")
        );
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_url() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APPLY_API_URL", "https://jobs.example.com/");
        env::set_var("APP_ENV", "prod");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.api.base_url, "https://jobs.example.com");
        assert_eq!(config.environment, AppEnvironment::Production);
        reset_env();
    }

    #[test]
    fn rejects_non_http_api_url() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APPLY_API_URL", "localhost:5000");
        let err = AppConfig::load().expect_err("scheme is required");
        assert!(matches!(err, ConfigError::InvalidApiUrl(_)));
        reset_env();
    }

    #[test]
    fn rejects_malformed_redirect_delay() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APPLY_REDIRECT_DELAY_MS", "soon");
        let err = AppConfig::load().expect_err("delay must be numeric");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "APPLY_REDIRECT_DELAY_MS"
            }
        ));
        reset_env();
    }
}
