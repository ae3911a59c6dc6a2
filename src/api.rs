//! HTTP client for the aviationweather.gov data API
//!
//! Issues batched METAR/TAF requests with bounded retries, exponential
//! backoff with jitter, and per-request timeouts. The retry client is the
//! only layer allowed to surface an error; see
//! [`MonitorError::RequestFailed`].

use crate::config::ApiConfig;
use crate::error::MonitorError;
use crate::models::{MetarRecord, TafDocument};
use crate::Result;
use anyhow::Context;
use rand::RngExt;
use reqwest::blocking::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Client for the aviation weather data API with retry logic.
///
/// Holds no per-request state, so one instance can serve METAR and TAF
/// fetches from concurrent threads.
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new API client from the configured retry/timeout knobs.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout_seconds))
            .user_agent(concat!("metar-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        info!(
            "Initialized API client for {} and {}",
            config.metar_url, config.taf_url
        );

        Ok(Self { client, config })
    }

    /// Fetch METAR records for the given stations in one batched request.
    ///
    /// Items that fail to parse or the whole-response shape check are
    /// skipped with a warning; only retry exhaustion is an error.
    #[instrument(skip(self, station_ids), fields(stations = station_ids.len()))]
    pub fn fetch_metar_data(&self, station_ids: &[String]) -> Result<Vec<MetarRecord>> {
        let url = format!(
            "{}?ids={}&format=json&hours={}",
            self.config.metar_url,
            station_ids.join(","),
            self.config.metar_hours
        );

        info!(
            "Fetching METAR data for {} airports: {}",
            station_ids.len(),
            station_ids.join(", ")
        );

        let records = self.fetch_records::<MetarRecord>(&url, "METAR")?;
        info!("Retrieved {} METAR observations", records.len());
        Ok(records)
    }

    /// Fetch TAF documents for the given stations in one batched request.
    #[instrument(skip(self, station_ids), fields(stations = station_ids.len()))]
    pub fn fetch_taf_data(&self, station_ids: &[String]) -> Result<Vec<TafDocument>> {
        let url = format!(
            "{}?ids={}&format=json&hours={}",
            self.config.taf_url,
            station_ids.join(","),
            self.config.taf_hours
        );

        info!(
            "Fetching TAF data for {} airports: {}",
            station_ids.len(),
            station_ids.join(", ")
        );

        let documents = self.fetch_records::<TafDocument>(&url, "TAF")?;
        info!("Retrieved {} TAF documents", documents.len());
        Ok(documents)
    }

    fn fetch_records<T: serde::de::DeserializeOwned>(&self, url: &str, kind: &str) -> Result<Vec<T>> {
        let value = self.make_request(url)?;

        let Value::Array(items) = value else {
            return Err(MonitorError::data_shape(format!(
                "{kind} response is not a JSON array"
            )));
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<T>(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed {kind} item: {e}"),
            }
        }

        Ok(records)
    }

    /// Make a GET request with retry, backoff, and response validation.
    fn make_request(&self, url: &str) -> Result<Value> {
        self.retry(|| {
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| format!("request error: {e}"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("HTTP status {status}"));
            }

            let value: Value = response.json().map_err(|e| format!("invalid JSON: {e}"))?;

            if !value.is_array() && !value.is_object() {
                return Err("invalid response format: expected array or object".to_string());
            }

            Ok(value)
        })
    }

    /// Run an attempt up to `max_retries + 1` times with exponential
    /// backoff and jitter between failures.
    fn retry<F>(&self, mut attempt: F) -> Result<Value>
    where
        F: FnMut() -> std::result::Result<Value, String>,
    {
        let max_attempts = self.config.max_retries + 1;
        let mut last_error = String::new();

        for failures in 0..max_attempts {
            debug!("Making request (attempt {}/{max_attempts})", failures + 1);

            match attempt() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("Request attempt {} failed: {e}", failures + 1);
                    last_error = e;
                }
            }

            if failures + 1 < max_attempts {
                let delay = self.backoff_delay(failures);
                info!("Retrying in {:.2} seconds", delay.as_secs_f64());
                thread::sleep(delay);
            }
        }

        Err(MonitorError::request_failed(max_attempts, last_error))
    }

    /// Backoff for the nth failure: `base * 2^n`, scaled by a uniform
    /// jitter factor in `[1 - jitter, 1 + jitter]`.
    fn backoff_delay(&self, failures: u32) -> Duration {
        let base = self.config.base_delay_seconds * 2.0_f64.powi(failures as i32);
        let jitter = self.config.jitter;
        let factor = 1.0 + rand::rng().random_range(-jitter..=jitter);
        Duration::from_secs_f64((base * factor).max(0.0))
    }
}

/// Reduce raw METAR records to the most recent observation per station.
///
/// The first record seen for a station wins unless a later one carries the
/// most-recent flag. Records without a station id are skipped.
#[must_use]
pub fn most_recent_metars(records: Vec<MetarRecord>) -> HashMap<String, MetarRecord> {
    let mut by_station: HashMap<String, MetarRecord> = HashMap::new();

    if records.is_empty() {
        warn!("No METAR data provided to process");
        return by_station;
    }

    for record in records {
        let Some(station_id) = record.icao_id.clone() else {
            warn!("Skipping METAR record with missing icaoId");
            continue;
        };

        match by_station.get(&station_id) {
            Some(_) if record.is_most_recent() => {
                debug!("Updated most recent METAR for {station_id}");
                by_station.insert(station_id, record);
            }
            Some(_) => {}
            None => {
                debug!("Added first METAR for {station_id}");
                by_station.insert(station_id, record);
            }
        }
    }

    info!("Processed METAR data for {} airports", by_station.len());
    by_station
}

/// Group TAF documents by station, preserving response order.
#[must_use]
pub fn group_tafs_by_station(documents: Vec<TafDocument>) -> HashMap<String, Vec<TafDocument>> {
    let mut by_station: HashMap<String, Vec<TafDocument>> = HashMap::new();

    if documents.is_empty() {
        warn!("No TAF data provided to process");
        return by_station;
    }

    for document in documents {
        let Some(station_id) = document.icao_id.clone() else {
            warn!("Skipping TAF record with missing icaoId");
            continue;
        };

        by_station.entry(station_id).or_default().push(document);
    }

    info!("Processed TAF data for {} airports", by_station.len());
    by_station
}
