//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/parklot/config.toml`, or the
//! path in `PARKLOT_CONFIG`). Every section has full defaults so the service
//! runs without a config file.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::RateTable;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub lot: LotConfig,
    pub rates: RatesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file path, used when no explicit URL is given
    pub path: String,
    /// Full connection URL; overrides `path` (e.g. for PostgreSQL)
    pub url: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "./parklot.db".to_string(),
            url: None,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}?mode=rwc", self.path))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing env-filter directive, e.g. "info" or "parklot=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LotConfig {
    /// Number of slots, numbered 1..=capacity
    pub capacity: u32,
    /// Offset defining the local calendar day for the closing report
    pub utc_offset_minutes: i32,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            capacity: 11,
            utc_offset_minutes: 0,
        }
    }
}

impl LotConfig {
    pub fn closing_offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    /// Price per billing unit for cars, in currency units
    pub car_rate: f64,
    /// Price per billing unit for motorcycles, in currency units
    pub motorcycle_rate: f64,
    /// Billing unit length in minutes
    pub unit_minutes: u32,
    /// Electric vehicle discount as a fraction in [0, 1)
    pub electric_discount_pct: f64,
    /// Minimum charge per stay, in currency units
    pub minimum_charge: f64,
    /// Currency code (ISO 4217)
    pub currency: String,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            car_rate: 120.0,
            motorcycle_rate: 62.0,
            unit_minutes: 60,
            electric_discount_pct: 0.25,
            minimum_charge: 0.0,
            currency: "COP".to_string(),
        }
    }
}

impl RatesConfig {
    pub fn rate_table(&self) -> Result<RateTable, ConfigError> {
        if !(0.0..1.0).contains(&self.electric_discount_pct) {
            return Err(ConfigError::Invalid(format!(
                "electric_discount_pct {} must be in [0, 1)",
                self.electric_discount_pct
            )));
        }
        if self.unit_minutes == 0 {
            return Err(ConfigError::Invalid(
                "unit_minutes must be positive".to_string(),
            ));
        }
        let discount = Decimal::try_from(self.electric_discount_pct)
            .map_err(|e| ConfigError::Invalid(format!("electric_discount_pct: {}", e)))?;
        Ok(RateTable {
            unit_minutes: self.unit_minutes,
            car_rate_cents: to_cents(self.car_rate)?,
            motorcycle_rate_cents: to_cents(self.motorcycle_rate)?,
            electric_discount: discount,
            minimum_charge_cents: to_cents(self.minimum_charge)?,
            currency: self.currency.clone(),
        })
    }
}

fn to_cents(amount: f64) -> Result<i64, ConfigError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "monetary amount {} must be a non-negative number",
            amount
        )));
    }
    Ok((amount * 100.0).round() as i64)
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Default config file location: `~/.config/parklot/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parklot")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        let rates = cfg.rates.rate_table().unwrap();
        assert_eq!(rates.car_rate_cents, 12000);
        assert_eq!(rates.motorcycle_rate_cents, 6200);
        assert_eq!(rates.unit_minutes, 60);
        assert_eq!(cfg.lot.capacity, 11);
        cfg.lot.closing_offset().unwrap();
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [lot]
            capacity = 4
            utc_offset_minutes = -300

            [rates]
            car_rate = 2.0
            minimum_charge = 1.0
            currency = "USD"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.lot.capacity, 4);
        let rates = cfg.rates.rate_table().unwrap();
        assert_eq!(rates.car_rate_cents, 200);
        assert_eq!(rates.minimum_charge_cents, 100);
        assert_eq!(rates.currency, "USD");
    }

    #[test]
    fn rejects_out_of_range_discount() {
        let rates = RatesConfig {
            electric_discount_pct: 1.5,
            ..Default::default()
        };
        assert!(rates.rate_table().is_err());
    }

    #[test]
    fn sqlite_url_from_path() {
        let db = DatabaseSection::default();
        assert_eq!(db.connection_url(), "sqlite://./parklot.db?mode=rwc");
        let db = DatabaseSection {
            url: Some("postgres://localhost/parklot".to_string()),
            ..Default::default()
        };
        assert_eq!(db.connection_url(), "postgres://localhost/parklot");
    }
}
