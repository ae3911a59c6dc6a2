//! Configuration management for the METAR monitor
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::MonitorError;
use crate::status::AlertThresholds;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the METAR monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Airports to monitor
    #[serde(default = "default_airports")]
    pub airports: Vec<AirportConfig>,
    /// ICAO identifiers shown green in the airports-visited display mode
    #[serde(default)]
    pub visited_airports: Vec<String>,
    /// Seconds between fetch cycles
    #[serde(default = "default_update_interval")]
    pub update_interval_seconds: u64,
    /// Forecast-hour offsets resolved from each TAF
    #[serde(default = "default_forecast_hours")]
    pub forecast_hours: Vec<u32>,
    /// Upstream API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Wind/gust/crosswind alert thresholds in knots
    #[serde(default)]
    pub thresholds: AlertThresholds,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One monitored airport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportConfig {
    /// ICAO identifier
    pub icao: String,
    /// Friendly name
    pub name: String,
    /// LED index on the strip, if one is wired for this airport
    #[serde(default)]
    pub led: Option<usize>,
    /// Runways used for active-runway and crosswind calculations
    #[serde(default)]
    pub runways: Vec<RunwayConfig>,
}

/// A runway with its magnetic heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayConfig {
    /// Runway designator, e.g. "16L"
    pub name: String,
    /// Heading in degrees (0-360)
    pub heading: u16,
}

/// Upstream aviation weather API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for METAR data
    #[serde(default = "default_metar_url")]
    pub metar_url: String,
    /// Base URL for TAF data
    #[serde(default = "default_taf_url")]
    pub taf_url: String,
    /// Hours of METAR history to request
    #[serde(default = "default_metar_hours")]
    pub metar_hours: u32,
    /// Hours of TAF data to request
    #[serde(default = "default_taf_hours")]
    pub taf_hours: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries in seconds
    #[serde(default = "default_base_delay")]
    pub base_delay_seconds: f64,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Jitter fraction applied to the backoff delay
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_airports() -> Vec<AirportConfig> {
    [
        ("KSEA", "Seattle-Tacoma Intl"),
        ("KBFI", "Boeing Field"),
        ("KRNT", "Renton Municipal"),
        ("KPAE", "Paine Field"),
        ("KTIW", "Tacoma Narrows"),
        ("KOLM", "Olympia Regional"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (icao, name))| AirportConfig {
        icao: (*icao).to_string(),
        name: (*name).to_string(),
        led: Some(i),
        runways: Vec::new(),
    })
    .collect()
}

fn default_update_interval() -> u64 {
    900
}

fn default_forecast_hours() -> Vec<u32> {
    vec![4, 6, 12, 18, 24]
}

fn default_metar_url() -> String {
    "https://aviationweather.gov/api/data/metar".to_string()
}

fn default_taf_url() -> String {
    "https://aviationweather.gov/api/data/taf".to_string()
}

fn default_metar_hours() -> u32 {
    2
}

fn default_taf_hours() -> u32 {
    12
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> f64 {
    2.0
}

fn default_timeout() -> f64 {
    10.0
}

fn default_jitter() -> f64 {
    0.5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            metar_url: default_metar_url(),
            taf_url: default_taf_url(),
            metar_hours: default_metar_hours(),
            taf_hours: default_taf_hours(),
            max_retries: default_max_retries(),
            base_delay_seconds: default_base_delay(),
            timeout_seconds: default_timeout(),
            jitter: default_jitter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            airports: default_airports(),
            visited_airports: Vec::new(),
            update_interval_seconds: default_update_interval(),
            forecast_hours: default_forecast_hours(),
            api: ApiConfig::default(),
            thresholds: AlertThresholds::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("metar_monitor.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with METAR_MONITOR_ prefix
        builder = builder.add_source(
            Environment::with_prefix("METAR_MONITOR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: MonitorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("metar-monitor").join("config.toml"))
    }

    /// Runways for a specific airport by ICAO code.
    #[must_use]
    pub fn runways_for(&self, icao: &str) -> &[RunwayConfig] {
        self.airports
            .iter()
            .find(|airport| airport.icao == icao)
            .map_or(&[], |airport| airport.runways.as_slice())
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_airports()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the airport list
    fn validate_airports(&self) -> Result<()> {
        if self.airports.is_empty() {
            return Err(MonitorError::config("At least one airport must be configured").into());
        }

        for airport in &self.airports {
            if airport.icao.len() != 4 || !airport.icao.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(MonitorError::config(format!(
                    "Invalid ICAO identifier '{}'",
                    airport.icao
                ))
                .into());
            }

            for runway in &airport.runways {
                if runway.heading > 360 {
                    return Err(MonitorError::config(format!(
                        "Runway {} at {} has heading {} outside 0-360",
                        runway.name, airport.icao, runway.heading
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.forecast_hours.is_empty() {
            return Err(MonitorError::config("forecast_hours cannot be empty").into());
        }

        if self.update_interval_seconds < 60 {
            return Err(
                MonitorError::config("Update interval cannot be shorter than 60 seconds").into(),
            );
        }

        if self.api.max_retries > 10 {
            return Err(MonitorError::config("API max retries cannot exceed 10").into());
        }

        if self.api.timeout_seconds <= 0.0 || self.api.timeout_seconds > 300.0 {
            return Err(
                MonitorError::config("API timeout must be between 0 and 300 seconds").into(),
            );
        }

        if !(0.0..1.0).contains(&self.api.jitter) {
            return Err(MonitorError::config("API jitter must be in [0, 1)").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(MonitorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for url in [&self.api.metar_url, &self.api.taf_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(MonitorError::config(
                    "API base URLs must be valid HTTP or HTTPS URLs",
                )
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.api.metar_url, "https://aviationweather.gov/api/data/metar");
        assert_eq!(config.update_interval_seconds, 900);
        assert_eq!(config.forecast_hours, vec![4, 6, 12, 18, 24]);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_runways_for_unknown_airport_is_empty() {
        let config = MonitorConfig::default();
        assert!(config.runways_for("KJFK").is_empty());
    }

    #[test]
    fn test_runways_for_configured_airport() {
        let mut config = MonitorConfig::default();
        config.airports[0].runways = vec![
            RunwayConfig {
                name: "16L".to_string(),
                heading: 160,
            },
            RunwayConfig {
                name: "34R".to_string(),
                heading: 340,
            },
        ];

        let runways = config.runways_for("KSEA");
        assert_eq!(runways.len(), 2);
        assert_eq!(runways[0].name, "16L");
    }

    #[test]
    fn test_validation_rejects_empty_airports() {
        let mut config = MonitorConfig::default();
        config.airports.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_icao() {
        let mut config = MonitorConfig::default();
        config.airports[0].icao = "SEA".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid ICAO"));
    }

    #[test]
    fn test_validation_rejects_bad_runway_heading() {
        let mut config = MonitorConfig::default();
        config.airports[0].runways = vec![RunwayConfig {
            name: "99X".to_string(),
            heading: 400,
        }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_forecast_hours() {
        let mut config = MonitorConfig::default();
        config.forecast_hours.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_log_level() {
        let mut config = MonitorConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let mut config = MonitorConfig::default();
        config.api.taf_url = "ftp://example.com/taf".to_string();
        assert!(config.validate().is_err());
    }
}
