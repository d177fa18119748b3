//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Daily reference rates published by the European Central Bank.
pub const DEFAULT_ECB_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rate source configuration.
    pub ecb: EcbConfig,
    /// Rate table cache configuration.
    pub cache: CacheConfig,
}

/// ECB rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EcbConfig {
    /// URL of the daily rate table.
    #[serde(default = "default_ecb_url")]
    pub url: String,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ecb_url() -> String {
    DEFAULT_ECB_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for EcbConfig {
    fn default() -> Self {
        Self {
            url: default_ecb_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Rate table cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the per-day cache files.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Whether fetched tables are cached on disk at all.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            enabled: default_cache_enabled(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `MONEYCONV__SECTION__KEY`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("MONEYCONV")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
