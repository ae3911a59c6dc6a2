//! Flight-category classification from visibility and ceiling
//!
//! Categories follow the standard FAA definitions: LIFR below 1 SM / 500 ft,
//! IFR below 3 SM / 1000 ft, MVFR below 5 SM / 3000 ft, VFR otherwise.

use crate::models::{ApiValue, CloudLayer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flight category derived from visibility and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightCategory {
    /// Visual Flight Rules
    Vfr,
    /// Marginal Visual Flight Rules
    Mvfr,
    /// Instrument Flight Rules
    Ifr,
    /// Low Instrument Flight Rules
    Lifr,
    /// Neither visibility nor ceiling was available
    Unknown,
}

impl FlightCategory {
    /// Long-form description of the category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "Visual Flight Rules",
            FlightCategory::Mvfr => "Marginal Visual Flight Rules",
            FlightCategory::Ifr => "Instrument Flight Rules",
            FlightCategory::Lifr => "Low Instrument Flight Rules",
            FlightCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightCategory::Vfr => write!(f, "VFR"),
            FlightCategory::Mvfr => write!(f, "MVFR"),
            FlightCategory::Ifr => write!(f, "IFR"),
            FlightCategory::Lifr => write!(f, "LIFR"),
            FlightCategory::Unknown => write!(f, "Unknown"),
        }
    }
}

// Visibility thresholds in statute miles, ceiling thresholds in feet.
const LIFR_VISIBILITY: f64 = 1.0;
const IFR_VISIBILITY: f64 = 3.0;
const MVFR_VISIBILITY: f64 = 5.0;
const LIFR_CEILING: u32 = 500;
const IFR_CEILING: u32 = 1000;
const MVFR_CEILING: u32 = 3000;

/// Classify a (visibility, ceiling) pair into a flight category.
///
/// Thresholds are evaluated LIFR → IFR → MVFR; within each band a low
/// visibility OR a low ceiling is sufficient, so a 400 ft overcast with
/// 10 SM visibility still classifies LIFR. Returns `Unknown` only when
/// both inputs are absent.
#[must_use]
pub fn classify(visibility: Option<f64>, ceiling: Option<u32>) -> FlightCategory {
    if visibility.is_none() && ceiling.is_none() {
        return FlightCategory::Unknown;
    }

    let vis_below = |limit: f64| visibility.is_some_and(|v| v < limit);
    let ceiling_below = |limit: u32| ceiling.is_some_and(|c| c < limit);

    if vis_below(LIFR_VISIBILITY) || ceiling_below(LIFR_CEILING) {
        FlightCategory::Lifr
    } else if vis_below(IFR_VISIBILITY) || ceiling_below(IFR_CEILING) {
        FlightCategory::Ifr
    } else if vis_below(MVFR_VISIBILITY) || ceiling_below(MVFR_CEILING) {
        FlightCategory::Mvfr
    } else {
        FlightCategory::Vfr
    }
}

/// Normalize a raw visibility value to statute miles.
///
/// METAR reports cap at "10+" and TAF periods at "6+"/"P6SM"; anything
/// else non-numeric is treated as unknown so classification falls back
/// to ceiling-only logic.
#[must_use]
pub fn visibility_sm(raw: Option<&ApiValue>) -> Option<f64> {
    let raw = raw?;
    match raw.as_text() {
        Some("10+") => Some(10.0),
        Some("6+") | Some("P6SM") => Some(6.0),
        _ => raw.as_f64(),
    }
}

/// Ceiling in feet: the lowest broken or overcast layer.
///
/// Layers with other cover codes or a missing/non-numeric base are ignored;
/// no qualifying layer means no ceiling.
#[must_use]
pub fn ceiling_ft(clouds: &[CloudLayer]) -> Option<u32> {
    clouds
        .iter()
        .filter(|layer| {
            matches!(layer.cover.as_deref(), Some("BKN") | Some("OVC"))
        })
        .filter_map(|layer| layer.base.as_ref().and_then(ApiValue::as_i64))
        .filter(|base| *base >= 0)
        .map(|base| base as u32)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn layer(cover: &str, base: f64) -> CloudLayer {
        CloudLayer {
            cover: Some(cover.to_string()),
            base: Some(ApiValue::Number(base)),
        }
    }

    #[test]
    fn test_unknown_when_both_missing() {
        assert_eq!(classify(None, None), FlightCategory::Unknown);
    }

    #[rstest]
    #[case(Some(0.5), None, FlightCategory::Lifr)]
    #[case(None, Some(400), FlightCategory::Lifr)]
    #[case(Some(2.0), None, FlightCategory::Ifr)]
    #[case(None, Some(800), FlightCategory::Ifr)]
    #[case(Some(4.0), None, FlightCategory::Mvfr)]
    #[case(None, Some(2500), FlightCategory::Mvfr)]
    #[case(Some(6.0), None, FlightCategory::Vfr)]
    #[case(None, Some(5000), FlightCategory::Vfr)]
    #[case(Some(10.0), Some(10000), FlightCategory::Vfr)]
    fn test_classify_thresholds(
        #[case] visibility: Option<f64>,
        #[case] ceiling: Option<u32>,
        #[case] expected: FlightCategory,
    ) {
        assert_eq!(classify(visibility, ceiling), expected);
    }

    #[test]
    fn test_low_ceiling_wins_over_good_visibility() {
        // OR semantics: a very low ceiling alone is sufficient
        assert_eq!(classify(Some(10.0), Some(400)), FlightCategory::Lifr);
        assert_eq!(classify(Some(10.0), Some(900)), FlightCategory::Ifr);
    }

    #[test]
    fn test_boundaries_are_strict() {
        // Exactly at a limit belongs to the better category
        assert_eq!(classify(Some(1.0), None), FlightCategory::Ifr);
        assert_eq!(classify(None, Some(500)), FlightCategory::Ifr);
        assert_eq!(classify(Some(5.0), Some(3000)), FlightCategory::Vfr);
    }

    #[test]
    fn test_classify_is_monotonic_in_visibility() {
        let order = |c: FlightCategory| match c {
            FlightCategory::Lifr => 0,
            FlightCategory::Ifr => 1,
            FlightCategory::Mvfr => 2,
            FlightCategory::Vfr => 3,
            FlightCategory::Unknown => 4,
        };

        let mut last = None;
        for tenths in 0..120 {
            let vis = f64::from(tenths) / 10.0;
            let rank = order(classify(Some(vis), Some(2000)));
            if let Some(prev) = last {
                assert!(rank >= prev, "category worsened as visibility improved");
            }
            last = Some(rank);
        }
    }

    #[test]
    fn test_visibility_sentinels() {
        assert_eq!(visibility_sm(Some(&ApiValue::Text("10+".into()))), Some(10.0));
        assert_eq!(visibility_sm(Some(&ApiValue::Text("6+".into()))), Some(6.0));
        assert_eq!(visibility_sm(Some(&ApiValue::Text("P6SM".into()))), Some(6.0));
        assert_eq!(visibility_sm(Some(&ApiValue::Number(2.5))), Some(2.5));
        assert_eq!(visibility_sm(Some(&ApiValue::Text("M1/4".into()))), None);
        assert_eq!(visibility_sm(None), None);
    }

    #[test]
    fn test_ceiling_takes_lowest_broken_or_overcast() {
        let clouds = vec![layer("FEW", 1500.0), layer("BKN", 2500.0), layer("OVC", 800.0)];
        assert_eq!(ceiling_ft(&clouds), Some(800));
    }

    #[test]
    fn test_ceiling_ignores_scattered_and_invalid_layers() {
        let clouds = vec![
            layer("SCT", 300.0),
            CloudLayer {
                cover: Some("BKN".to_string()),
                base: Some(ApiValue::Text("unknown".into())),
            },
            CloudLayer {
                cover: Some("OVC".to_string()),
                base: None,
            },
        ];
        assert_eq!(ceiling_ft(&clouds), None);
    }

    #[test]
    fn test_ceiling_empty_clouds() {
        assert_eq!(ceiling_ft(&[]), None);
    }
}
