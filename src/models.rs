//! Wire-format records for the aviationweather.gov data API
//!
//! The upstream API is loose about types: visibility may be a number or a
//! sentinel string ("10+", "P6SM"), wind direction may be a number or "VRB",
//! and TAF time bounds occasionally arrive as strings. [`ApiValue`] captures
//! that number-or-text duality so parsing failures degrade to "value unknown"
//! instead of rejecting the whole record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON field that may be either numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiValue {
    Number(f64),
    Text(String),
}

impl ApiValue {
    /// Numeric view of the value, parsing textual numbers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ApiValue::Number(n) => Some(*n),
            ApiValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Integer view of the value. Fractional numbers are rejected rather
    /// than truncated, so a corrupt timestamp never silently shifts.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ApiValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            ApiValue::Number(_) => None,
            ApiValue::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    /// Textual view of the value, if it is a string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiValue::Text(s) => Some(s.as_str()),
            ApiValue::Number(_) => None,
        }
    }
}

impl fmt::Display for ApiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            ApiValue::Number(n) => write!(f, "{n}"),
            ApiValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A single cloud layer within a METAR observation or TAF period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudLayer {
    /// Cover code (FEW, SCT, BKN, OVC, ...)
    #[serde(default)]
    pub cover: Option<String>,
    /// Base height in feet AGL
    #[serde(default)]
    pub base: Option<ApiValue>,
}

/// One METAR observation as returned by the data API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetarRecord {
    /// Station identifier; records without one are skipped upstream
    #[serde(rename = "icaoId", default)]
    pub icao_id: Option<String>,
    /// Raw observation text
    #[serde(rename = "rawOb", default)]
    pub raw_ob: Option<String>,
    /// Visibility in statute miles, or a sentinel like "10+"
    #[serde(default)]
    pub visib: Option<ApiValue>,
    /// Wind direction in degrees, or "VRB"
    #[serde(default)]
    pub wdir: Option<ApiValue>,
    /// Wind speed in knots
    #[serde(default)]
    pub wspd: Option<ApiValue>,
    /// Wind gust in knots
    #[serde(default)]
    pub wgst: Option<ApiValue>,
    /// Reported cloud layers
    #[serde(default)]
    pub clouds: Vec<CloudLayer>,
    /// 1 when this is the most recent observation for the station
    #[serde(rename = "mostRecent", default)]
    pub most_recent: Option<i64>,
}

impl MetarRecord {
    /// Whether the API flagged this record as the station's most recent.
    #[must_use]
    pub fn is_most_recent(&self) -> bool {
        self.most_recent == Some(1)
    }
}

/// One forecast period inside a TAF document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPeriod {
    /// Period start, seconds since the epoch
    #[serde(rename = "timeFrom", default)]
    pub time_from: Option<ApiValue>,
    /// Period end, seconds since the epoch
    #[serde(rename = "timeTo", default)]
    pub time_to: Option<ApiValue>,
    /// Change indicator (FM, TEMPO, BECMG, ...)
    #[serde(rename = "fcstChange", default)]
    pub fcst_change: Option<String>,
    /// Forecast wind direction in degrees
    #[serde(default)]
    pub wdir: Option<ApiValue>,
    /// Forecast wind speed in knots
    #[serde(default)]
    pub wspd: Option<ApiValue>,
    /// Forecast visibility in statute miles, or "6+"/"P6SM"
    #[serde(default)]
    pub visib: Option<ApiValue>,
    /// Forecast cloud layers
    #[serde(default)]
    pub clouds: Vec<CloudLayer>,
}

/// One TAF document as returned by the data API.
///
/// A station may have several competing documents per batch fetch; forecast
/// selection picks exactly one (see [`crate::taf::most_recent_taf`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TafDocument {
    /// Station identifier; documents without one are skipped upstream
    #[serde(rename = "icaoId", default)]
    pub icao_id: Option<String>,
    /// Raw TAF text
    #[serde(rename = "rawTAF", default)]
    pub raw_taf: Option<String>,
    /// 1 when this is the most recent TAF for the station
    #[serde(rename = "mostRecent", default)]
    pub most_recent: Option<i64>,
    /// Ordered forecast periods
    #[serde(default)]
    pub fcsts: Vec<ForecastPeriod>,
}

impl TafDocument {
    /// Whether the API flagged this document as the station's most recent.
    #[must_use]
    pub fn is_most_recent(&self) -> bool {
        self.most_recent == Some(1)
    }
}
