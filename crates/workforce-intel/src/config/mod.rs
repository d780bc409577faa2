use crate::analytics::config::EngineConfig;
use std::env;
use std::fmt;
use std::path::PathBuf;

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
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut engine = match env::var("INTEL_ENGINE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => load_engine_config(PathBuf::from(path.trim()))?,
            _ => EngineConfig::default(),
        };

        if let Ok(raw) = env::var("INTEL_TOP_K") {
            engine.comparison.top_k = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|top_k| *top_k > 0)
                .ok_or(ConfigError::InvalidTopK { value: raw })?;
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine,
        })
    }
}

fn load_engine_config(path: PathBuf) -> Result<EngineConfig, ConfigError> {
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(source) => return Err(ConfigError::EngineConfigUnreadable { path, source }),
    };
    serde_json::from_str(&raw).map_err(|source| ConfigError::InvalidEngineConfig { path, source })
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTopK {
        value: String,
    },
    EngineConfigUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidEngineConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTopK { value } => {
                write!(f, "INTEL_TOP_K must be a positive integer, got '{value}'")
            }
            ConfigError::EngineConfigUnreadable { path, .. } => {
                write!(f, "unable to read engine config {}", path.display())
            }
            ConfigError::InvalidEngineConfig { path, source } => {
                write!(f, "engine config {} is not valid: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidTopK { .. } => None,
            ConfigError::EngineConfigUnreadable { source, .. } => Some(source),
            ConfigError::InvalidEngineConfig { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::config::CORRELATION_TOP_K;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("INTEL_ENGINE_CONFIG");
        env::remove_var("INTEL_TOP_K");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn top_k_override_is_validated() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("INTEL_TOP_K", "4");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.engine.comparison.top_k, 4);

        env::set_var("INTEL_TOP_K", "0");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTopK { ref value } if value == "0"));
        reset_env();
    }

    #[test]
    fn engine_config_file_overrides_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = env::temp_dir().join(format!("intel-engine-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "signals": { "max_signals": 3 } }"#).expect("write config");
        env::set_var("INTEL_ENGINE_CONFIG", &path);

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.engine.signals.max_signals, 3);
        assert_eq!(config.engine.comparison.top_k, CORRELATION_TOP_K);

        std::fs::write(&path, "not json").expect("write config");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEngineConfig { .. }));

        std::fs::remove_file(&path).ok();
        reset_env();
    }
}
