//! Alert-color resolution and warning text
//!
//! Combines the flight category with wind, gust, thunderstorm, and
//! crosswind signals into a single display color, plus a human-readable
//! warning suffix explaining any yellow alert.

use crate::category::FlightCategory;
use crate::wind::WindData;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// Wind group with the speed captured, e.g. 27015KT or 27015G25KT.
static WINDS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}(\d{2})(?:G\d+)?KT\b").unwrap());

// Gusting wind group with the gust captured, e.g. 27015G25KT.
static GUSTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}\d{2}G(\d+)KT\b").unwrap());

const THUNDERSTORM_INDICATORS: [&str; 2] = ["TSRA", " TS "];

/// Alert thresholds in knots. All comparisons are strict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Sustained wind speed above which the status turns yellow
    #[serde(default = "default_wind_kt")]
    pub wind_kt: u32,
    /// Gust speed above which the status turns yellow
    #[serde(default = "default_gust_kt")]
    pub gust_kt: u32,
    /// Crosswind component above which the status turns yellow
    #[serde(default = "default_crosswind_kt")]
    pub crosswind_kt: f64,
}

fn default_wind_kt() -> u32 {
    20
}

fn default_gust_kt() -> u32 {
    25
}

fn default_crosswind_kt() -> f64 {
    15.0
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            wind_kt: default_wind_kt(),
            gust_kt: default_gust_kt(),
            crosswind_kt: default_crosswind_kt(),
        }
    }
}

/// Display color for an airport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusColor {
    /// VFR
    Green,
    /// MVFR
    Blue,
    /// IFR
    Red,
    /// LIFR
    Purple,
    /// Wind, gust, crosswind, or thunderstorm warning
    Yellow,
    /// Mode indicator: current observations
    White,
    /// Mode indicator: forecast view
    Cyan,
    /// Mode indicator: airports-visited view
    Orange,
    /// Mode indicator: test view
    Pink,
    /// No data
    Off,
}

impl StatusColor {
    /// ANSI escape code for console output.
    #[must_use]
    pub fn ansi(&self) -> &'static str {
        match self {
            StatusColor::Green => "\x1b[92m",
            StatusColor::Blue => "\x1b[34m",
            StatusColor::Red => "\x1b[91m",
            StatusColor::Purple => "\x1b[95m",
            StatusColor::Yellow => "\x1b[93m",
            StatusColor::White => "\x1b[97m",
            StatusColor::Cyan => "\x1b[96m",
            StatusColor::Orange => "\x1b[33m",
            StatusColor::Pink => "\x1b[35m",
            StatusColor::Off => "\x1b[0m",
        }
    }

    /// ANSI reset code.
    #[must_use]
    pub fn reset() -> &'static str {
        "\x1b[0m"
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusColor::Green => "GREEN",
            StatusColor::Blue => "BLUE",
            StatusColor::Red => "RED",
            StatusColor::Purple => "PURPLE",
            StatusColor::Yellow => "YELLOW",
            StatusColor::White => "WHITE",
            StatusColor::Cyan => "CYAN",
            StatusColor::Orange => "ORANGE",
            StatusColor::Pink => "PINK",
            StatusColor::Off => "OFF",
        };
        write!(f, "{name}")
    }
}

impl From<FlightCategory> for StatusColor {
    fn from(category: FlightCategory) -> Self {
        match category {
            FlightCategory::Vfr => StatusColor::Green,
            FlightCategory::Mvfr => StatusColor::Blue,
            FlightCategory::Ifr => StatusColor::Red,
            FlightCategory::Lifr => StatusColor::Purple,
            FlightCategory::Unknown => StatusColor::Off,
        }
    }
}

fn wind_speed_in(raw_text: &str) -> Option<u32> {
    WINDS_PATTERN
        .captures(raw_text)
        .and_then(|captures| captures[1].parse().ok())
}

fn gust_speed_in(raw_text: &str) -> Option<u32> {
    GUSTS_PATTERN
        .captures(raw_text)
        .and_then(|captures| captures[1].parse().ok())
}

fn has_thunderstorm(raw_text: &str) -> bool {
    THUNDERSTORM_INDICATORS
        .iter()
        .any(|indicator| raw_text.contains(indicator))
}

/// Resolve the alert color for an airport status.
///
/// Crosswind exceedance is checked first, then sustained winds, gusts,
/// and thunderstorm indicators in the raw text; only when none of those
/// trip does the flight category decide the color.
#[must_use]
pub fn resolve_status_color(
    raw_text: &str,
    category: FlightCategory,
    wind: Option<&WindData>,
    thresholds: &AlertThresholds,
) -> StatusColor {
    if let Some(crosswind) = wind.and_then(|w| w.crosswind) {
        if crosswind > thresholds.crosswind_kt {
            return StatusColor::Yellow;
        }
    }

    if !raw_text.is_empty() {
        if wind_speed_in(raw_text).is_some_and(|speed| speed > thresholds.wind_kt) {
            return StatusColor::Yellow;
        }

        if gust_speed_in(raw_text).is_some_and(|gust| gust > thresholds.gust_kt) {
            return StatusColor::Yellow;
        }

        if has_thunderstorm(raw_text) {
            return StatusColor::Yellow;
        }
    }

    StatusColor::from(category)
}

/// Warning suffix explaining a yellow status, empty for any other color.
///
/// Crosswind takes precedence, then thunderstorm, gusts, and plain strong
/// wind; the generic fallback keeps the formatter total even if the text
/// no longer matches any specific pattern.
#[must_use]
pub fn warning_text(
    color: StatusColor,
    raw_text: &str,
    wind: Option<&WindData>,
    thresholds: &AlertThresholds,
) -> String {
    if color != StatusColor::Yellow {
        return String::new();
    }

    if let Some(wind) = wind {
        if let (Some(crosswind), Some(runway), Some(direction)) =
            (wind.crosswind, wind.active_runway.as_ref(), wind.direction)
        {
            if crosswind > thresholds.crosswind_kt {
                return format!(
                    " - Crosswind {crosswind:.1}KT from {direction:03}\u{b0} on RWY {}",
                    runway.name
                );
            }
        }
    }

    if has_thunderstorm(raw_text) {
        return " - Thunderstorm".to_string();
    }

    if let Some(gust) = gust_speed_in(raw_text) {
        if gust > thresholds.gust_kt {
            return format!(" - Gusts {gust}KT");
        }
    }

    if let Some(speed) = wind_speed_in(raw_text) {
        if speed > thresholds.wind_kt {
            return format!(" - Winds {speed}KT");
        }
    }

    " - Weather warning".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunwayConfig;

    fn crosswind_data(crosswind: f64) -> WindData {
        WindData {
            direction: Some(200),
            speed: Some(18),
            crosswind: Some(crosswind),
            headwind: Some(5.0),
            active_runway: Some(RunwayConfig {
                name: "16L".to_string(),
                heading: 160,
            }),
            ..WindData::default()
        }
    }

    #[test]
    fn test_category_colors() {
        let thresholds = AlertThresholds::default();
        let calm = "KSEA 010000Z 26005KT 10SM FEW100";

        assert_eq!(
            resolve_status_color(calm, FlightCategory::Vfr, None, &thresholds),
            StatusColor::Green
        );
        assert_eq!(
            resolve_status_color(calm, FlightCategory::Mvfr, None, &thresholds),
            StatusColor::Blue
        );
        assert_eq!(
            resolve_status_color(calm, FlightCategory::Ifr, None, &thresholds),
            StatusColor::Red
        );
        assert_eq!(
            resolve_status_color(calm, FlightCategory::Lifr, None, &thresholds),
            StatusColor::Purple
        );
        assert_eq!(
            resolve_status_color(calm, FlightCategory::Unknown, None, &thresholds),
            StatusColor::Off
        );
    }

    #[test]
    fn test_strong_wind_turns_yellow() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 26035KT 10SM FEW100";

        let color = resolve_status_color(raw, FlightCategory::Vfr, None, &thresholds);
        assert_eq!(color, StatusColor::Yellow);
        assert_eq!(warning_text(color, raw, None, &thresholds), " - Winds 35KT");
    }

    #[test]
    fn test_wind_at_threshold_is_not_yellow() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 26020KT 10SM FEW100";
        assert_eq!(
            resolve_status_color(raw, FlightCategory::Vfr, None, &thresholds),
            StatusColor::Green
        );
    }

    #[test]
    fn test_gusts_turn_yellow() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 26015G30KT 10SM FEW100";

        let color = resolve_status_color(raw, FlightCategory::Vfr, None, &thresholds);
        assert_eq!(color, StatusColor::Yellow);
        assert_eq!(warning_text(color, raw, None, &thresholds), " - Gusts 30KT");
    }

    #[test]
    fn test_gust_at_threshold_is_not_yellow() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 26015G25KT 10SM FEW100";
        assert_eq!(
            resolve_status_color(raw, FlightCategory::Vfr, None, &thresholds),
            StatusColor::Green
        );
    }

    #[test]
    fn test_thunderstorm_turns_yellow() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 26005KT 3SM TSRA BKN015";

        let color = resolve_status_color(raw, FlightCategory::Mvfr, None, &thresholds);
        assert_eq!(color, StatusColor::Yellow);
        assert_eq!(warning_text(color, raw, None, &thresholds), " - Thunderstorm");
    }

    #[test]
    fn test_crosswind_strictly_above_threshold() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 20018KT 10SM FEW100";

        // Exactly at the threshold: not yellow
        let at_limit = crosswind_data(15.0);
        assert_eq!(
            resolve_status_color(raw, FlightCategory::Vfr, Some(&at_limit), &thresholds),
            StatusColor::Green
        );

        // One knot above: yellow with a crosswind warning
        let over = crosswind_data(16.0);
        let color = resolve_status_color(raw, FlightCategory::Vfr, Some(&over), &thresholds);
        assert_eq!(color, StatusColor::Yellow);

        let warning = warning_text(color, raw, Some(&over), &thresholds);
        assert!(warning.contains("Crosswind 16.0KT"));
        assert!(warning.contains("RWY 16L"));
        assert!(warning.contains("200"));
    }

    #[test]
    fn test_crosswind_beats_other_warnings_in_text() {
        let thresholds = AlertThresholds::default();
        let raw = "KSEA 010000Z 20030G40KT 10SM FEW100";
        let wind = crosswind_data(20.0);

        let color = resolve_status_color(raw, FlightCategory::Vfr, Some(&wind), &thresholds);
        let warning = warning_text(color, raw, Some(&wind), &thresholds);
        assert!(warning.starts_with(" - Crosswind"));
    }

    #[test]
    fn test_no_warning_for_non_yellow() {
        let thresholds = AlertThresholds::default();
        assert_eq!(
            warning_text(StatusColor::Green, "KSEA 26005KT", None, &thresholds),
            ""
        );
    }

    #[test]
    fn test_generic_fallback_warning() {
        let thresholds = AlertThresholds::default();
        assert_eq!(
            warning_text(StatusColor::Yellow, "no wind groups here", None, &thresholds),
            " - Weather warning"
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = AlertThresholds {
            wind_kt: 10,
            gust_kt: 12,
            crosswind_kt: 5.0,
        };
        let raw = "KSEA 010000Z 26012KT 10SM FEW100";
        assert_eq!(
            resolve_status_color(raw, FlightCategory::Vfr, None, &thresholds),
            StatusColor::Yellow
        );
    }
}
