//! Display modes for the airport map
//!
//! The map cycles through observation, forecast, visited-airports, and
//! test views. Each mode resolves its own color per airport; a dedicated
//! indicator color identifies the active mode on the display.

use crate::airport_data::AirportStatus;
use crate::status::StatusColor;
use crate::taf;
use std::fmt;

/// One view of the airport map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Current observations
    Metar,
    /// Forecast at the given hour offset
    Taf(u32),
    /// Highlights airports on the visited list
    AirportsVisited,
    /// Lights every airport that has any observation data
    Test,
}

impl DisplayMode {
    /// The next mode in the cycle.
    ///
    /// Runs METAR, then one TAF view per configured hour offset in order,
    /// then the visited and test views, and wraps back to METAR. An empty
    /// offset list skips the TAF views entirely.
    #[must_use]
    pub fn next(self, forecast_hours: &[u32]) -> DisplayMode {
        match self {
            DisplayMode::Metar => match forecast_hours.first() {
                Some(&hours) => DisplayMode::Taf(hours),
                None => DisplayMode::AirportsVisited,
            },
            DisplayMode::Taf(current) => {
                let following = forecast_hours
                    .iter()
                    .skip_while(|&&h| h != current)
                    .nth(1);
                match following {
                    Some(&hours) => DisplayMode::Taf(hours),
                    None => DisplayMode::AirportsVisited,
                }
            }
            DisplayMode::AirportsVisited => DisplayMode::Test,
            DisplayMode::Test => DisplayMode::Metar,
        }
    }

    /// Color of the mode indicator while this mode is active.
    #[must_use]
    pub fn indicator_color(self) -> StatusColor {
        match self {
            DisplayMode::Metar => StatusColor::White,
            DisplayMode::Taf(_) => StatusColor::Cyan,
            DisplayMode::AirportsVisited => StatusColor::Orange,
            DisplayMode::Test => StatusColor::Pink,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Metar => write!(f, "METAR"),
            DisplayMode::Taf(hours) => write!(f, "TAF +{hours}h"),
            DisplayMode::AirportsVisited => write!(f, "Airports Visited"),
            DisplayMode::Test => write!(f, "Test"),
        }
    }
}

/// Resolve the color one airport shows in the given mode.
///
/// A TAF view with no forecast at the requested offset falls back to the
/// closest resolved offset, and goes dark only when the station has no
/// forecasts at all.
#[must_use]
pub fn color_for_mode(
    mode: DisplayMode,
    status: &AirportStatus,
    visited_airports: &[String],
) -> StatusColor {
    match mode {
        DisplayMode::Metar => status.color,
        DisplayMode::Taf(hours) => {
            let snapshot = status.taf.forecasts.get(&hours).or_else(|| {
                taf::closest_hour(status.taf.forecasts.keys().copied(), hours)
                    .and_then(|closest| status.taf.forecasts.get(&closest))
            });
            snapshot.map_or(StatusColor::Off, |s| s.color)
        }
        DisplayMode::AirportsVisited => {
            if visited_airports.iter().any(|icao| *icao == status.icao) {
                StatusColor::Green
            } else {
                StatusColor::Red
            }
        }
        DisplayMode::Test => {
            if status.raw_metar.is_some() {
                StatusColor::Green
            } else {
                StatusColor::Red
            }
        }
    }
}
