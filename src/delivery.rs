//! Delivery engine: earliest downlink following a detection
use log::debug;
use strum_macros::{Display, EnumString};

use crate::{
    detection::DetectionResult,
    errors::Error,
    interval::{AccessInterval, SatelliteIndex},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [RelayMode] defines which satellites may downlink a detection.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RelayMode {
    /// No relay: only the detecting satellite may downlink
    #[default]
    FixedSatellite,
    /// Any satellite may downlink (inter satellite or ground relay network)
    AnySatellite,
}

/// [DeliveryResult] describes the first downlink of a detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeliveryResult {
    pub detecting_satellite: SatelliteIndex,
    /// Satellite that downlinks the detection
    pub downlink_satellite: SatelliteIndex,
    /// Detection instant (s)
    pub detect_s: f64,
    /// Downlink window opening (s)
    pub downlink_s: f64,
    /// downlink_s - detect_s
    pub latency_s: f64,
}

/// [DeliveryOutcome] of one delivery attempt.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeliveryOutcome {
    Delivered(DeliveryResult),
    /// No eligible downlink window opens after detection,
    /// within the modeled horizon.
    NotDelivered,
}

impl DeliveryOutcome {
    /// True if detection was delivered
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    /// Returns the [DeliveryResult], if any
    pub fn result(&self) -> Option<&DeliveryResult> {
        match self {
            Self::Delivered(result) => Some(result),
            Self::NotDelivered => None,
        }
    }

    /// Returns delivery latency (s), if any
    pub fn latency_s(&self) -> Option<f64> {
        self.result().map(|result| result.latency_s)
    }
}

/// Determines the earliest downlink of a detection.
///
/// ## Input
/// - detecting_satellite: satellite that reported the vessel
/// - detect_s: detection instant (s)
/// - downlinks: ground station access windows, tagged by satellite,
/// ground station after ground station (see [ConstellationConfig::downlink_windows]).
/// All ground stations are eligible.
/// - relay: [RelayMode]
///
/// ## Output
/// Candidates are the eligible windows opening at or after `detect_s`.
/// Windows already open at detection time do not qualify.
/// The candidate opening first wins. Equal openings are won by the
/// first one listed in `downlinks`: first ground station, then report order.
///
/// ```
/// use eezwatch::prelude::*;
///
/// let downlinks = [
///     AccessInterval::new(SatelliteIndex(0), 100.0, 200.0).unwrap(),
///     AccessInterval::new(SatelliteIndex(1), 5000.0, 5300.0).unwrap(),
/// ];
///
/// // detecting satellite already passed the ground station
/// let outcome = deliver(SatelliteIndex(0), 1000.0, &downlinks, RelayMode::FixedSatellite)
///     .unwrap();
/// assert!(!outcome.is_delivered());
///
/// // relayed through satellite 1
/// let outcome = deliver(SatelliteIndex(0), 1000.0, &downlinks, RelayMode::AnySatellite)
///     .unwrap();
/// let delivery = outcome.result().unwrap();
/// assert_eq!(delivery.downlink_satellite, SatelliteIndex(1));
/// assert_eq!(delivery.latency_s, 4000.0);
/// ```
///
/// [ConstellationConfig::downlink_windows]: crate::constellation::ConstellationConfig::downlink_windows
pub fn deliver(
    detecting_satellite: SatelliteIndex,
    detect_s: f64,
    downlinks: &[AccessInterval],
    relay: RelayMode,
) -> Result<DeliveryOutcome, Error> {
    if !detect_s.is_finite() {
        return Err(Error::NonFiniteTime);
    }

    let mut best: Option<&AccessInterval> = None;

    for window in downlinks.iter() {
        window.validate()?;

        if relay == RelayMode::FixedSatellite && window.subject != detecting_satellite {
            continue;
        }

        if window.start_s < detect_s {
            continue;
        }

        match best {
            Some(best) if best.start_s <= window.start_s => {},
            _ => best = Some(window),
        }
    }

    match best {
        Some(window) => {
            debug!(
                "{} detection at {}s - downlink by {} at {}s ({})",
                detecting_satellite, detect_s, window.subject, window.start_s, relay
            );
            Ok(DeliveryOutcome::Delivered(DeliveryResult {
                detecting_satellite,
                downlink_satellite: window.subject,
                detect_s,
                downlink_s: window.start_s,
                latency_s: window.start_s - detect_s,
            }))
        },
        None => {
            debug!(
                "{} detection at {}s - no downlink ({})",
                detecting_satellite, detect_s, relay
            );
            Ok(DeliveryOutcome::NotDelivered)
        },
    }
}

/// Determines the earliest downlink of this [DetectionResult], see [deliver].
pub fn deliver_detection(
    detection: &DetectionResult,
    downlinks: &[AccessInterval],
    relay: RelayMode,
) -> Result<DeliveryOutcome, Error> {
    deliver(detection.detecting_satellite, detection.detect_s, downlinks, relay)
}
