//! Detection engine: earliest satellite report of a vessel in a zone
use log::debug;

use crate::{
    constellation::PassTable,
    errors::Error,
    interval::{overlaps, starts_within, validate_span, AccessInterval, SatelliteIndex, VesselPresence},
    policy::{DetectionStrategy, OverlapRule, PassSelection},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [DetectionResult] describes the first satellite report of a vessel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectionResult {
    pub vessel_id: String,
    pub zone_id: String,
    /// Zone entry (s)
    pub entry_s: f64,
    /// Detection report (s), never prior to entry
    pub detect_s: f64,
    /// Satellite that reported the vessel
    pub detecting_satellite: SatelliteIndex,
    /// detect_s - entry_s
    pub latency_s: f64,
}

/// [DetectionOutcome] of one detection attempt. Not being detected
/// is a legitimate, reportable outcome.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectionOutcome {
    Detected(DetectionResult),
    /// No eligible satellite had a qualifying pass
    NotDetected,
}

impl DetectionOutcome {
    /// True if vessel was detected
    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected(_))
    }

    /// Returns the [DetectionResult], if any
    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            Self::Detected(result) => Some(result),
            Self::NotDetected => None,
        }
    }

    /// Returns detection latency (s), if any
    pub fn latency_s(&self) -> Option<f64> {
        self.result().map(|result| result.latency_s)
    }
}

/// Candidate pass a satellite contributes under this strategy, if any.
fn satellite_candidate<'a>(
    presence: &VesselPresence,
    passes: &'a [AccessInterval],
    strategy: &DetectionStrategy,
) -> Option<&'a AccessInterval> {
    let mut qualifying = passes.iter().filter(|pass| match strategy.overlap {
        OverlapRule::AnyOverlap => overlaps(presence, *pass),
        OverlapRule::StartWithin => starts_within(presence, *pass),
    });

    match strategy.selection {
        // min_by returns the first of equal minima: ties keep input order
        PassSelection::EarliestStart => qualifying.min_by(|a, b| a.start_s.total_cmp(&b.start_s)),
        PassSelection::FirstListed => qualifying.next(),
    }
}

/// Determines the earliest instant any eligible satellite may report
/// this vessel.
///
/// ## Input
/// - presence: [VesselPresence] of the vessel within the zone
/// - passes: zone access windows, per satellite, see [PassTable]
/// - strategy: resolved [DetectionStrategy]
///
/// ## Output
/// - [DetectionOutcome::Detected] with the winning satellite.
/// Each satellite proposes `max(pass.start, entry) + delay`
/// for its selected pass, the smallest proposal wins. Equal proposals
/// are won by the lowest satellite index.
/// - [DetectionOutcome::NotDetected] when no eligible satellite has a qualifying pass,
/// including when `passes` is empty.
/// - [Error] when a reversed or corrupted interval is encountered.
///
/// ```
/// use eezwatch::prelude::*;
///
/// let ship = VesselPresence::new("Ship1", "EEZ_West", 1000.0, 5000.0)
///     .unwrap();
///
/// let passes = pass_table(&[
///     AccessInterval::new(SatelliteIndex(0), 3000.0, 3400.0).unwrap(),
///     AccessInterval::new(SatelliteIndex(1), 900.0, 1100.0).unwrap(),
/// ]);
///
/// let strategy = TaskingPolicy::Patrol.strategy(&SensorParams::default(), true);
///
/// let outcome = detect(&ship, &passes, &strategy)
///     .unwrap();
///
/// let detection = outcome.result().unwrap();
/// assert_eq!(detection.detecting_satellite, SatelliteIndex(1));
/// assert_eq!(detection.detect_s, 1030.0);
/// assert_eq!(detection.latency_s, 30.0);
/// ```
pub fn detect(
    presence: &VesselPresence,
    passes: &PassTable,
    strategy: &DetectionStrategy,
) -> Result<DetectionOutcome, Error> {
    validate_span(presence)?;

    let entry_s = presence.entry_s();
    let delay_s = strategy.processing_delay_s.max(0.0);

    let mut best: Option<(f64, SatelliteIndex)> = None;

    for (satellite, sat_passes) in passes.iter() {
        for pass in sat_passes.iter() {
            pass.validate()?;
        }

        if !strategy.eligibility.admits(*satellite) {
            continue;
        }

        let pass = match satellite_candidate(presence, sat_passes, strategy) {
            Some(pass) => pass,
            None => continue,
        };

        let candidate_s = pass.start_s.max(entry_s) + delay_s;

        debug!(
            "{}({}) - {} candidate pass [{}, {}] => {}s",
            presence.vessel_id, presence.zone_id, satellite, pass.start_s, pass.stop_s, candidate_s
        );

        match best {
            Some((best_s, _)) if best_s <= candidate_s => {},
            _ => best = Some((candidate_s, *satellite)),
        }
    }

    match best {
        Some((detect_s, detecting_satellite)) => {
            debug!(
                "{}({}) - detected by {} at {}s",
                presence.vessel_id, presence.zone_id, detecting_satellite, detect_s
            );
            Ok(DetectionOutcome::Detected(DetectionResult {
                vessel_id: presence.vessel_id.clone(),
                zone_id: presence.zone_id.clone(),
                entry_s,
                detect_s,
                detecting_satellite,
                latency_s: detect_s - entry_s,
            }))
        },
        None => {
            debug!("{}({}) - not detected", presence.vessel_id, presence.zone_id);
            Ok(DetectionOutcome::NotDetected)
        },
    }
}
