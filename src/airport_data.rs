//! Per-airport status aggregation
//!
//! Owns the fetch cycle: pulls METAR and TAF data for every configured
//! airport, then rebuilds the full set of airport statuses wholesale.
//! A failed fetch degrades to empty data rather than aborting the cycle,
//! so stale statuses never linger past an update.

use crate::api::{self, ApiClient};
use crate::category::{self, FlightCategory};
use crate::config::{AirportConfig, MonitorConfig};
use crate::models::{MetarRecord, TafDocument};
use crate::status::{self, AlertThresholds, StatusColor};
use crate::taf::{self, TafResult};
use crate::wind::{self, WindData};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// Everything the displays need to know about one airport.
#[derive(Debug, Clone)]
pub struct AirportStatus {
    /// ICAO identifier
    pub icao: String,
    /// Friendly name from the configuration
    pub name: String,
    /// LED index on the strip, if one is wired for this airport
    pub led: Option<usize>,
    /// Raw METAR text, when an observation was available
    pub raw_metar: Option<String>,
    /// Flight category from the current observation
    pub category: FlightCategory,
    /// Wind analysis for the current observation
    pub wind: WindData,
    /// Resolved alert color
    pub color: StatusColor,
    /// Warning suffix for yellow statuses, empty otherwise
    pub warning: String,
    /// Forecast snapshots resolved from the station's TAF
    pub taf: TafResult,
}

/// Build the status for one airport from its latest observation and TAFs.
#[must_use]
pub fn airport_status(
    airport: &AirportConfig,
    metar: Option<&MetarRecord>,
    tafs: &[TafDocument],
    forecast_hours: &[u32],
    thresholds: &AlertThresholds,
    now: DateTime<Local>,
) -> AirportStatus {
    let raw_metar = metar.and_then(|m| m.raw_ob.clone());
    let raw_text = raw_metar.as_deref().unwrap_or("");

    let category = match metar {
        Some(metar) => category::classify(
            category::visibility_sm(metar.visib.as_ref()),
            category::ceiling_ft(&metar.clouds),
        ),
        None => FlightCategory::Unknown,
    };

    let wind = wind::airport_wind(raw_text, &airport.runways);
    let color = status::resolve_status_color(raw_text, category, Some(&wind), thresholds);
    let warning = status::warning_text(color, raw_text, Some(&wind), thresholds);
    let taf = taf::process_taf_data(&airport.icao, tafs, forecast_hours, thresholds, now);

    debug!(
        "{}: {} {}{}",
        airport.icao, category, color, warning
    );

    AirportStatus {
        icao: airport.icao.clone(),
        name: airport.name.clone(),
        led: airport.led,
        raw_metar,
        category,
        wind,
        color,
        warning,
        taf,
    }
}

/// Fetches weather data and maintains the current status of every
/// configured airport.
pub struct AirportDataManager {
    config: MonitorConfig,
    client: ApiClient,
    statuses: Vec<AirportStatus>,
    last_update: Option<DateTime<Local>>,
}

impl AirportDataManager {
    /// Create a manager for the configured airports.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let client = ApiClient::new(config.api.clone())?;
        info!(
            "Managing {} airports: {}",
            config.airports.len(),
            config
                .airports
                .iter()
                .map(|a| a.icao.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            config,
            client,
            statuses: Vec::new(),
            last_update: None,
        })
    }

    /// Run one fetch cycle and rebuild all airport statuses.
    ///
    /// Returns false when either fetch failed or the METAR batch came back
    /// empty; statuses are still rebuilt from whatever data did arrive.
    #[instrument(skip(self))]
    pub fn update(&mut self) -> bool {
        let station_ids: Vec<String> = self
            .config
            .airports
            .iter()
            .map(|a| a.icao.clone())
            .collect();

        let mut cycle_ok = true;

        let metars = match self.client.fetch_metar_data(&station_ids) {
            Ok(records) => api::most_recent_metars(records),
            Err(e) => {
                error!("METAR fetch failed: {}", e.user_message());
                cycle_ok = false;
                HashMap::new()
            }
        };

        // An empty METAR batch means no airport was updated this cycle,
        // even when the fetch itself succeeded.
        if metars.is_empty() {
            warn!("No METAR data for any airport this cycle");
            cycle_ok = false;
        }

        let tafs = match self.client.fetch_taf_data(&station_ids) {
            Ok(documents) => api::group_tafs_by_station(documents),
            Err(e) => {
                error!("TAF fetch failed: {}", e.user_message());
                cycle_ok = false;
                HashMap::new()
            }
        };

        self.rebuild(&metars, &tafs, Local::now());
        self.last_update = Some(Local::now());

        info!(
            "Update cycle {}: {} airports with METAR, {} with TAF",
            if cycle_ok { "complete" } else { "degraded" },
            metars.len(),
            tafs.len()
        );

        cycle_ok
    }

    /// Rebuild every airport status from already-fetched data.
    pub fn rebuild(
        &mut self,
        metars: &HashMap<String, MetarRecord>,
        tafs: &HashMap<String, Vec<TafDocument>>,
        now: DateTime<Local>,
    ) {
        self.statuses = self
            .config
            .airports
            .iter()
            .map(|airport| {
                airport_status(
                    airport,
                    metars.get(&airport.icao),
                    tafs.get(&airport.icao).map_or(&[][..], Vec::as_slice),
                    &self.config.forecast_hours,
                    &self.config.thresholds,
                    now,
                )
            })
            .collect();
    }

    /// All airport statuses in configuration order.
    #[must_use]
    pub fn statuses(&self) -> &[AirportStatus] {
        &self.statuses
    }

    /// Status for one airport, if it is configured.
    #[must_use]
    pub fn status(&self, icao: &str) -> Option<&AirportStatus> {
        self.statuses.iter().find(|s| s.icao == icao)
    }

    /// Time of the last completed update cycle.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    /// The configuration this manager was built from.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}
