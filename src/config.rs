use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::fetch::RetryPolicy;
use crate::i18n::Language;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub i18n: I18nConfig,
    pub fetch: FetchConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub static_dir: PathBuf,
    /// Root holding `locales/` and `data/`.
    pub content_dir: PathBuf,
    /// JSON file backing the dictionary cache.
    pub storage_path: PathBuf,
    /// Absolute origin used for canonical and alternate links.
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct I18nConfig {
    pub default_language: Language,
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub motion_library_enabled: bool,
    pub banner_dismiss: Duration,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source; unset keys take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Server configuration
        let host = var("SERVER_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;
        let port = var("SERVER_PORT", "8000")
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // App configuration
        let environment = var("APP_ENVIRONMENT", "development")
            .parse::<Environment>()
            .unwrap_or_default();
        let base_url = var("SITE_BASE_URL", "http://localhost:8000")
            .trim_end_matches('/')
            .to_string();

        // Translations
        let default_language = var("DEFAULT_LANGUAGE", "en")
            .parse::<Language>()
            .context("Failed to parse DEFAULT_LANGUAGE")?;
        let cache_ttl_hours = var("TRANSLATION_CACHE_TTL_HOURS", "24")
            .parse::<u64>()
            .context("Failed to parse TRANSLATION_CACHE_TTL_HOURS")?;

        // Fetching
        let max_attempts = var("FETCH_MAX_ATTEMPTS", "3")
            .parse::<u32>()
            .context("Failed to parse FETCH_MAX_ATTEMPTS")?;
        if max_attempts == 0 {
            anyhow::bail!("FETCH_MAX_ATTEMPTS must be at least 1");
        }
        let initial_backoff_ms = var("FETCH_INITIAL_BACKOFF_MS", "1000")
            .parse::<u64>()
            .context("Failed to parse FETCH_INITIAL_BACKOFF_MS")?;

        // Page behaviour
        let motion_library_enabled = var("MOTION_LIBRARY_ENABLED", "false")
            .parse::<bool>()
            .context("Failed to parse MOTION_LIBRARY_ENABLED")?;
        let banner_dismiss_ms = var("BANNER_DISMISS_MS", "6000")
            .parse::<u64>()
            .context("Failed to parse BANNER_DISMISS_MS")?;

        Ok(Config {
            server: ServerConfig { host, port },
            app: AppConfig {
                name: var("APP_NAME", "Vientiane Build Consult"),
                environment,
                static_dir: PathBuf::from(var("STATIC_DIR", "static")),
                content_dir: PathBuf::from(var("CONTENT_DIR", "content")),
                storage_path: PathBuf::from(var("STORAGE_PATH", "var/storage.json")),
                base_url,
            },
            i18n: I18nConfig {
                default_language,
                cache_ttl: Duration::from_secs(cache_ttl_hours * 60 * 60),
            },
            fetch: FetchConfig {
                max_attempts,
                initial_backoff: Duration::from_millis(initial_backoff_ms),
            },
            ui: UiConfig {
                motion_library_enabled,
                banner_dismiss: Duration::from_millis(banner_dismiss_ms),
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.fetch.max_attempts, self.fetch.initial_backoff)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.i18n.default_language, Language::English);
        assert_eq!(config.i18n.cache_ttl, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.initial_backoff, Duration::from_secs(1));
        assert!(!config.ui.motion_library_enabled);
        assert_eq!(config.ui.banner_dismiss, Duration::from_secs(6));
        assert!(!config.is_production());
    }

    #[test]
    fn values_are_parsed() {
        let config = config_from(&[
            ("SERVER_PORT", "3000"),
            ("APP_ENVIRONMENT", "Production"),
            ("SITE_BASE_URL", "https://vientianebuild.la/"),
            ("DEFAULT_LANGUAGE", "lo"),
            ("MOTION_LIBRARY_ENABLED", "true"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.app.base_url, "https://vientianebuild.la");
        assert_eq!(config.i18n.default_language, Language::Lao);
        assert!(config.ui.motion_library_enabled);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = config_from(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
        assert!(config_from(&[("DEFAULT_LANGUAGE", "fr")]).is_err());
        assert!(config_from(&[("FETCH_MAX_ATTEMPTS", "0")]).is_err());
    }
}
