//! Wind extraction and crosswind calculations
//!
//! Parses wind groups out of raw METAR/TAF text, resolves the most likely
//! active runway from configured runway headings, and computes crosswind
//! and headwind components for it.

use crate::config::RunwayConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static WIND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3})(\d{2})(?:G(\d+))?KT").unwrap());

static VRB_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"VRB(\d{2})KT").unwrap());

/// Wind conditions derived from raw report text.
///
/// Computed fresh per classification call and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindData {
    /// Wind direction in degrees
    pub direction: Option<u16>,
    /// Wind speed in knots
    pub speed: Option<u16>,
    /// Gust speed in knots
    pub gust: Option<u16>,
    /// True for variable ("VRB") winds
    pub variable: bool,
    /// Crosswind component in knots, when a runway could be resolved
    pub crosswind: Option<f64>,
    /// Headwind component in knots (negative means tailwind)
    pub headwind: Option<f64>,
    /// The runway the components are relative to
    pub active_runway: Option<RunwayConfig>,
}

/// Extract wind direction, speed, and gusts from raw report text.
///
/// Variable winds short-circuit: only the speed is pulled from the
/// `VRB..KT` group, and no crosswind is ever computed for them.
#[must_use]
pub fn extract_wind(raw_text: &str) -> WindData {
    let mut wind = WindData::default();

    if raw_text.is_empty() {
        return wind;
    }

    if raw_text.contains("VRB") {
        wind.variable = true;
        if let Some(captures) = VRB_PATTERN.captures(raw_text) {
            wind.speed = captures[1].parse().ok();
        }
        return wind;
    }

    if let Some(captures) = WIND_PATTERN.captures(raw_text) {
        wind.direction = captures[1].parse().ok();
        wind.speed = captures[2].parse().ok();
        wind.gust = captures.get(3).and_then(|g| g.as_str().parse().ok());
    }

    wind
}

/// Smallest angular difference between two headings, in the range 0-180.
fn angular_difference(a: f64, b: f64) -> f64 {
    (((a - b + 180.0).rem_euclid(360.0)) - 180.0).abs()
}

/// Determine the most likely active runway for a wind direction.
///
/// Picks the runway whose heading is angularly closest to the wind; ties
/// resolve to the first runway in the configured order.
#[must_use]
pub fn active_runway(wind_direction: u16, runways: &[RunwayConfig]) -> Option<&RunwayConfig> {
    let mut best: Option<(&RunwayConfig, f64)> = None;

    for runway in runways {
        let angle = angular_difference(f64::from(runway.heading), f64::from(wind_direction));
        match best {
            Some((_, min_angle)) if angle >= min_angle => {}
            _ => best = Some((runway, angle)),
        }
    }

    best.map(|(runway, _)| runway)
}

/// Crosswind and headwind components of a wind relative to a runway.
///
/// Crosswind is always reported as a magnitude; headwind goes negative
/// for a tailwind.
#[must_use]
pub fn crosswind_components(
    wind_speed: f64,
    wind_direction: f64,
    runway_heading: f64,
) -> (f64, f64) {
    let angle = angular_difference(wind_direction, runway_heading).to_radians();
    let crosswind = (wind_speed * angle.sin()).abs();
    let headwind = wind_speed * angle.cos();
    (crosswind, headwind)
}

/// Full wind analysis for one airport: extraction, active-runway selection,
/// and crosswind components when the configured runways allow it.
#[must_use]
pub fn airport_wind(raw_text: &str, runways: &[RunwayConfig]) -> WindData {
    let mut wind = extract_wind(raw_text);

    if wind.variable {
        return wind;
    }

    let (Some(direction), Some(speed)) = (wind.direction, wind.speed) else {
        return wind;
    };

    let Some(runway) = active_runway(direction, runways) else {
        return wind;
    };

    let (crosswind, headwind) =
        crosswind_components(f64::from(speed), f64::from(direction), f64::from(runway.heading));

    debug!(
        "Wind {:03}@{:02}, runway {} ({:03}°), crosswind {:.1}, headwind {:.1}",
        direction, speed, runway.name, runway.heading, crosswind, headwind
    );

    wind.crosswind = Some(crosswind);
    wind.headwind = Some(headwind);
    wind.active_runway = Some(runway.clone());
    wind
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runway(name: &str, heading: u16) -> RunwayConfig {
        RunwayConfig {
            name: name.to_string(),
            heading,
        }
    }

    #[test]
    fn test_extract_plain_wind() {
        let wind = extract_wind("KSEA 010000Z 27015KT 10SM FEW100");
        assert_eq!(wind.direction, Some(270));
        assert_eq!(wind.speed, Some(15));
        assert_eq!(wind.gust, None);
        assert!(!wind.variable);
    }

    #[test]
    fn test_extract_gusting_wind() {
        let wind = extract_wind("KSEA 010000Z 27015G25KT 10SM FEW100");
        assert_eq!(wind.direction, Some(270));
        assert_eq!(wind.speed, Some(15));
        assert_eq!(wind.gust, Some(25));
    }

    #[test]
    fn test_extract_variable_wind() {
        let wind = extract_wind("KSEA 010000Z VRB04KT 10SM CLR");
        assert!(wind.variable);
        assert_eq!(wind.speed, Some(4));
        assert_eq!(wind.direction, None);
        assert_eq!(wind.gust, None);
    }

    #[test]
    fn test_extract_no_wind_group() {
        let wind = extract_wind("KSEA 010000Z 10SM FEW100");
        assert_eq!(wind.direction, None);
        assert_eq!(wind.speed, None);
        assert!(!wind.variable);
    }

    #[test]
    fn test_angular_difference_wraps() {
        assert_eq!(angular_difference(350.0, 10.0), 20.0);
        assert_eq!(angular_difference(0.0, 180.0), 180.0);
        assert_eq!(angular_difference(90.0, 90.0), 0.0);
        assert_eq!(angular_difference(10.0, 350.0), 20.0);
    }

    #[test]
    fn test_active_runway_picks_closest() {
        let runways = vec![runway("16", 160), runway("34", 340)];
        assert_eq!(active_runway(170, &runways), Some(&runways[0]));
        assert_eq!(active_runway(330, &runways), Some(&runways[1]));
    }

    #[test]
    fn test_active_runway_tie_break_is_first_in_order() {
        // Wind at 250 is exactly 90° from both headings
        let runways = vec![runway("16", 160), runway("34", 340)];
        for _ in 0..10 {
            assert_eq!(active_runway(250, &runways), Some(&runways[0]));
        }
    }

    #[test]
    fn test_active_runway_no_runways() {
        assert_eq!(active_runway(270, &[]), None);
    }

    #[test]
    fn test_crosswind_components_direct_crosswind() {
        let (crosswind, headwind) = crosswind_components(10.0, 90.0, 0.0);
        assert!((crosswind - 10.0).abs() < 1e-9);
        assert!(headwind.abs() < 1e-9);
    }

    #[test]
    fn test_crosswind_components_headwind_and_tailwind() {
        let (crosswind, headwind) = crosswind_components(12.0, 180.0, 180.0);
        assert!(crosswind.abs() < 1e-9);
        assert!((headwind - 12.0).abs() < 1e-9);

        let (_, tailwind) = crosswind_components(12.0, 0.0, 180.0);
        assert!((tailwind + 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_crosswind_components_angled() {
        let (crosswind, headwind) = crosswind_components(20.0, 230.0, 200.0);
        assert!((crosswind - 20.0 * 30.0_f64.to_radians().sin()).abs() < 1e-9);
        assert!((headwind - 20.0 * 30.0_f64.to_radians().cos()).abs() < 1e-9);
    }

    #[test]
    fn test_airport_wind_full_analysis() {
        let runways = vec![runway("16L", 160), runway("34R", 340)];
        let wind = airport_wind("KSEA 010000Z 20018KT 10SM BKN030", &runways);

        assert_eq!(wind.direction, Some(200));
        assert_eq!(wind.speed, Some(18));
        assert_eq!(wind.active_runway.as_ref().map(|r| r.name.as_str()), Some("16L"));

        let crosswind = wind.crosswind.unwrap();
        let expected = 18.0 * 40.0_f64.to_radians().sin();
        assert!((crosswind - expected).abs() < 1e-9);
        assert!(wind.headwind.unwrap() > 0.0);
    }

    #[test]
    fn test_airport_wind_variable_never_computes_crosswind() {
        let runways = vec![runway("16L", 160)];
        let wind = airport_wind("KSEA 010000Z VRB06KT 10SM CLR", &runways);
        assert!(wind.variable);
        assert!(wind.crosswind.is_none());
        assert!(wind.active_runway.is_none());
    }

    #[test]
    fn test_airport_wind_no_runways_configured() {
        let wind = airport_wind("KSEA 010000Z 27015KT 10SM CLR", &[]);
        assert_eq!(wind.speed, Some(15));
        assert!(wind.crosswind.is_none());
    }
}
