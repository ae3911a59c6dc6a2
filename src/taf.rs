//! TAF forecast selection and processing
//!
//! Picks the authoritative TAF document for a station, locates the forecast
//! period covering each configured hour offset, and renders a classified,
//! color-resolved snapshot per offset.

use crate::category::{self, FlightCategory};
use crate::models::{ApiValue, CloudLayer, ForecastPeriod, TafDocument};
use crate::status::{self, AlertThresholds, StatusColor};
use chrono::{DateTime, Duration, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A processed forecast for one hour offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    /// Flight category for the period
    pub category: FlightCategory,
    /// Alert color for the period
    pub color: StatusColor,
    /// Warning suffix when the color is yellow
    pub warning: String,
    /// One-line summary: change indicator, period start, wind, visibility, clouds
    pub summary: String,
    /// Period start in local time
    pub time_from: DateTime<Local>,
    /// Period end in local time, when the bound parsed
    pub time_to: Option<DateTime<Local>>,
}

/// Forecast results for one airport across all configured hour offsets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TafResult {
    /// Raw text of the selected TAF document
    pub raw_forecast: Option<String>,
    /// The 6-hour forecast, or the first resolved offset when 6h is absent
    pub primary: Option<ForecastSnapshot>,
    /// Snapshot per forecast-hour offset
    pub forecasts: BTreeMap<u32, ForecastSnapshot>,
}

/// Select the authoritative TAF from a station's competing documents.
///
/// Prefers the document flagged most-recent; with none flagged, the first
/// in response order wins.
#[must_use]
pub fn most_recent_taf(documents: &[TafDocument]) -> Option<&TafDocument> {
    documents
        .iter()
        .find(|doc| doc.is_most_recent())
        .or_else(|| documents.first())
}

fn period_time(value: Option<&ApiValue>) -> Option<DateTime<Local>> {
    let epoch = value?.as_i64()?;
    Local.timestamp_opt(epoch, 0).single()
}

/// Find the forecast period covering the target time.
///
/// Periods are scanned in document order; one with missing or non-integer
/// time bounds is skipped and the scan continues. Returns the period and
/// its start time, or `None` when nothing covers the target.
#[must_use]
pub fn find_relevant_period<'a>(
    periods: &'a [ForecastPeriod],
    target_time: DateTime<Local>,
) -> Option<(&'a ForecastPeriod, DateTime<Local>)> {
    for period in periods {
        let (Some(from_time), Some(to_time)) = (
            period_time(period.time_from.as_ref()),
            period_time(period.time_to.as_ref()),
        ) else {
            warn!("Skipping forecast period with invalid time bounds");
            continue;
        };

        if from_time <= target_time && target_time <= to_time {
            return Some((period, from_time));
        }
    }

    None
}

/// Format wind direction and speed as a fixed-width group, e.g. "27015".
///
/// Each component falls back to a placeholder ("---"/"--") when absent or
/// non-numeric, so concatenation always succeeds.
#[must_use]
pub fn format_wind(wdir: Option<&ApiValue>, wspd: Option<&ApiValue>) -> String {
    let dir = wdir
        .and_then(ApiValue::as_i64)
        .map_or_else(|| "---".to_string(), |d| format!("{d:03}"));
    let speed = wspd
        .and_then(ApiValue::as_i64)
        .map_or_else(|| "--".to_string(), |s| format!("{s:02}"));
    format!("{dir}{speed}")
}

/// Format cloud layers as a space-separated string, e.g. "BKN025 OVC080".
#[must_use]
pub fn format_clouds(clouds: &[CloudLayer]) -> String {
    clouds
        .iter()
        .filter_map(|layer| {
            let cover = layer.cover.as_deref().filter(|c| !c.is_empty())?;
            let base = layer.base.as_ref()?;
            Some(format!("{cover}{base}"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Process one forecast period into a classified, color-resolved snapshot.
#[must_use]
pub fn process_forecast_period(
    period: &ForecastPeriod,
    from_time: DateTime<Local>,
    thresholds: &AlertThresholds,
) -> ForecastSnapshot {
    let change = period.fcst_change.as_deref().unwrap_or("");
    let wind_text = format_wind(period.wdir.as_ref(), period.wspd.as_ref());
    let visib_text = period
        .visib
        .as_ref()
        .map_or_else(String::new, ApiValue::to_string);
    let clouds_text = format_clouds(&period.clouds);

    let summary = format!(
        "{change} {} {wind_text}KT {visib_text} {clouds_text}",
        from_time.format("%d%H%M")
    );

    let visibility = category::visibility_sm(period.visib.as_ref());
    let ceiling = category::ceiling_ft(&period.clouds);
    let flight_category = category::classify(visibility, ceiling);

    // Color resolution works on report-shaped text, so synthesize one from
    // the formatted wind, visibility, and clouds.
    let forecast_text = format!("{wind_text}KT {visib_text} {clouds_text}");
    let color = status::resolve_status_color(&forecast_text, flight_category, None, thresholds);
    let warning = status::warning_text(color, &forecast_text, None, thresholds);

    ForecastSnapshot {
        category: flight_category,
        color,
        warning,
        summary,
        time_from: from_time,
        time_to: period_time(period.time_to.as_ref()),
    }
}

/// Process a station's TAF documents across the configured hour offsets.
///
/// Offsets whose target time falls outside every period simply have no
/// entry in the result; the caller treats that as "no forecast available".
#[must_use]
pub fn process_taf_data(
    station_id: &str,
    documents: &[TafDocument],
    forecast_hours: &[u32],
    thresholds: &AlertThresholds,
    now: DateTime<Local>,
) -> TafResult {
    let mut result = TafResult::default();

    let Some(document) = most_recent_taf(documents) else {
        warn!("No valid TAF found for {station_id}");
        return result;
    };

    result.raw_forecast = document.raw_taf.clone();

    if document.fcsts.is_empty() {
        warn!("No forecast periods in TAF for {station_id}");
        return result;
    }

    for &hours in forecast_hours {
        let target_time = now + Duration::hours(i64::from(hours));

        let Some((period, from_time)) = find_relevant_period(&document.fcsts, target_time) else {
            debug!("No forecast period found for {station_id} at +{hours} hours");
            continue;
        };

        let snapshot = process_forecast_period(period, from_time, thresholds);

        if hours == 6 || result.primary.is_none() {
            result.primary = Some(snapshot.clone());
        }

        result.forecasts.insert(hours, snapshot);
    }

    debug!(
        "Processed {} forecast periods for {station_id}",
        result.forecasts.len()
    );

    result
}

/// Closest key in an ordered set of hour offsets.
///
/// Ties in absolute distance resolve to the smaller offset, so repeated
/// lookups are deterministic.
#[must_use]
pub fn closest_hour<I>(available: I, requested: u32) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    available
        .into_iter()
        .min_by_key(|&hour| (hour.abs_diff(requested), hour))
}
