//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CLOUDSTOCK_DB_PATH=/data/cloudstock.db                             │
//! │     CLOUDSTOCK_IMPORT_DELAY_MS=0                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cloudstock/cloudstock.toml (Linux)                       │
//! │     ~/Library/Application Support/my.cloudstock.cloudstock/... (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [business]
//! name = "Kedai Aisyah"
//! currency_symbol = "RM"
//!
//! [storage]
//! database_path = "/home/aisyah/cloudstock.db"
//! backup_dir = "/home/aisyah/Downloads"
//!
//! [dashboard]
//! low_stock_threshold = 5
//! trend_months = 6
//!
//! [import]
//! delay_ms = 1000
//!
//! [expenses]
//! categories = ["Packaging", "Postage & Courier", "Others"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use cloudstock_core::validation::ExpenseCategories;
use cloudstock_core::{Money, LOW_STOCK_THRESHOLD, TREND_MONTHS};

const CONFIG_FILE_NAME: &str = "cloudstock.toml";
const DATABASE_FILE_NAME: &str = "cloudstock.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Could not determine the application data directory")]
    NoProjectDirs,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Shown in the header and in formatted amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_business_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_business_name() -> String {
    "CloudStock".to_string()
}

fn default_currency_symbol() -> String {
    "RM".to_string()
}

impl Default for BusinessConfig {
    fn default() -> Self {
        BusinessConfig {
            name: default_business_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// File locations. Unset paths resolve under the platform data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Item groups below this many units are flagged.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// Months shown on the trend chart.
    #[serde(default = "default_trend_months")]
    pub trend_months: usize,
}

fn default_low_stock_threshold() -> i64 {
    LOW_STOCK_THRESHOLD
}

fn default_trend_months() -> usize {
    TREND_MONTHS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            low_stock_threshold: default_low_stock_threshold(),
            trend_months: default_trend_months(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Simulated platform round-trip before the mock order lands.
    #[serde(default = "default_import_delay_ms")]
    pub delay_ms: u64,
}

fn default_import_delay_ms() -> u64 {
    1000
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            delay_ms: default_import_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseConfig {
    /// Allow-list for the expense category field.
    #[serde(default)]
    pub categories: ExpenseCategories,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub business: BusinessConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub expenses: ExpenseConfig,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Override with config file (if it exists)
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoProjectDirs)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.business.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "currency_symbol must not be empty".into(),
            ));
        }

        if self.dashboard.trend_months == 0 {
            return Err(ConfigError::Invalid(
                "trend_months must be greater than 0".into(),
            ));
        }

        if self.expenses.categories.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one expense category is required".into(),
            ));
        }

        Ok(())
    }

    /// Applies `CLOUDSTOCK_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("CLOUDSTOCK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = var("CLOUDSTOCK_BACKUP_DIR") {
            self.storage.backup_dir = Some(PathBuf::from(dir));
        }

        if let Some(name) = var("CLOUDSTOCK_BUSINESS_NAME") {
            self.business.name = name;
        }

        if let Some(delay) = var("CLOUDSTOCK_IMPORT_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.import.delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid CLOUDSTOCK_IMPORT_DELAY_MS"),
            }
        }

        if let Some(threshold) = var("CLOUDSTOCK_LOW_STOCK_THRESHOLD") {
            match threshold.parse::<i64>() {
                Ok(t) => self.dashboard.low_stock_threshold = t,
                Err(_) => {
                    warn!(value = %threshold, "Ignoring invalid CLOUDSTOCK_LOW_STOCK_THRESHOLD")
                }
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("my", "cloudstock", "cloudstock")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Resolved Paths
    // =========================================================================

    /// Where the SQLite database lives.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Self::project_dirs()
                .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
                .ok_or(ConfigError::NoProjectDirs),
        }
    }

    /// Default directory for exported backups.
    pub fn backup_dir(&self) -> ConfigResult<PathBuf> {
        match &self.storage.backup_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("backups"))
                .ok_or(ConfigError::NoProjectDirs),
        }
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Formats an amount with the configured currency symbol.
    ///
    /// ```rust
    /// use cloudstock_app::config::AppConfig;
    /// use cloudstock_core::Money;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_sen(1234)), "RM12.34");
    /// assert_eq!(config.format_currency(Money::from_sen(-50)), "-RM0.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}",
            if amount.is_negative() { "-" } else { "" },
            self.business.currency_symbol,
            amount.abs()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
