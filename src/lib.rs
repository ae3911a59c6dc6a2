//! `metar-monitor` - Aviation weather monitoring for a Seattle-area airport map
//!
//! This library fetches METAR observations and TAF forecasts from
//! aviationweather.gov, classifies flight categories, analyzes winds and
//! crosswinds against configured runways, and resolves the alert color
//! each airport shows on the map.

pub mod airport_data;
pub mod api;
pub mod category;
pub mod config;
pub mod error;
pub mod models;
pub mod modes;
pub mod status;
pub mod taf;
pub mod wind;

// Re-export core types for public API
pub use airport_data::{AirportDataManager, AirportStatus};
pub use api::ApiClient;
pub use category::FlightCategory;
pub use config::{AirportConfig, ApiConfig, MonitorConfig, RunwayConfig};
pub use error::MonitorError;
pub use modes::DisplayMode;
pub use status::{AlertThresholds, StatusColor};
pub use taf::{ForecastSnapshot, TafResult};
pub use wind::WindData;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
