use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use time_tz::timezones;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Zone used to decide "today" for period options and the month view.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverConfig {
    #[serde(default = "default_solver_base_url")]
    pub base_url: String,
    /// Optimization runs are slow; the client waits this long per request.
    #[serde(default = "default_solver_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_target_cost")]
    pub default_target_cost: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: default_solver_base_url(),
            timeout_secs: default_solver_timeout_secs(),
            default_target_cost: default_target_cost(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

fn default_solver_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_solver_timeout_secs() -> u64 {
    300
}

fn default_target_cost() -> f64 {
    1500.0
}

fn default_catalog_path() -> String {
    "reciept.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (KONDATE__SOLVER__BASE_URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Set defaults
        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Try to load config file (optional - ignore if not found)
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        // Override with environment variables (KONDATE__SOLVER__BASE_URL, etc.)
        builder = builder.add_source(
            Environment::with_prefix("KONDATE")
                .separator("__")
                .try_parsing(true),
        );

        // Also support plain variables without the prefix
        if let Ok(solver_url) = env::var("SOLVER_URL") {
            builder = builder.set_override("solver.base_url", solver_url)?;
        }
        if let Ok(catalog_path) = env::var("CATALOG_PATH") {
            builder = builder.set_override("catalog.path", catalog_path)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if timezones::get_by_name(&self.server.timezone).is_none() {
            return Err(format!("Unknown timezone: {}", self.server.timezone));
        }
        if self.solver.base_url.is_empty() {
            return Err("Solver base_url must not be empty".to_string());
        }
        if self.solver.timeout_secs == 0 {
            return Err("Solver timeout_secs must be at least 1".to_string());
        }
        if !self.solver.default_target_cost.is_finite() || self.solver.default_target_cost <= 0.0 {
            return Err("Solver default_target_cost must be a positive number".to_string());
        }
        if self.catalog.path.is_empty() {
            return Err("Catalog path must not be empty".to_string());
        }
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(format!("Unknown log level: {}", self.logging.level));
        }
        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(format!("Unknown log format: {}", self.logging.format));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                timezone: "Asia/Tokyo".to_string(),
            },
            solver: SolverConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_timezone() {
        let mut config = valid_config();
        config.server.timezone = "Mars/Olympus_Mons".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = valid_config();
        config.solver.timeout_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_negative_target_cost() {
        let mut config = valid_config();
        config.solver.default_target_cost = -100.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_log_format() {
        let mut config = valid_config();
        config.logging.format = "xml".to_string();

        assert!(config.validate().is_err());
    }
}
