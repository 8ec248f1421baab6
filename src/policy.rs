//! Tasking policies and the detection strategies they resolve to
use strum_macros::{Display, EnumIter, EnumString};

use crate::{errors::ConfigurationError, interval::SatelliteIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Typical SAR processing delay, from sensing to detection report (s)
pub const SAR_PROCESSING_DELAY_SECONDS: f64 = 30.0;

/// Processing delay reduction applied when tracking a vessel on a known route
const TRACKING_DELAY_FACTOR: f64 = 0.8;

/// Only one satellite out of this many is tasked on vessels off known routes
const DARK_TARGET_STRIDE: usize = 3;

/// [SensorParams] gathers the sensor and ground segment figures
/// the tasking policies depend on.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorParams {
    /// Delay from sensing to detection report (s)
    pub processing_delay_s: f64,
    /// Multiplier applied to the processing delay, when
    /// tracking vessels on known routes. Must lie within ]0, 1].
    pub tracking_delay_factor: f64,
    /// Eligibility stride for off route vessels: satellite `i`
    /// contributes only when `i % stride == 0`
    pub dark_target_stride: usize,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            processing_delay_s: SAR_PROCESSING_DELAY_SECONDS,
            tracking_delay_factor: TRACKING_DELAY_FACTOR,
            dark_target_stride: DARK_TARGET_STRIDE,
        }
    }
}

impl SensorParams {
    /// Returns new [SensorParams] with desired processing delay (s)
    pub fn with_processing_delay_s(&self, delay_s: f64) -> Self {
        let mut s = *self;
        s.processing_delay_s = delay_s;
        s
    }

    /// Returns new [SensorParams] with desired tracking delay factor
    pub fn with_tracking_delay_factor(&self, factor: f64) -> Self {
        let mut s = *self;
        s.tracking_delay_factor = factor;
        s
    }

    /// Returns new [SensorParams] with desired dark target stride
    pub fn with_dark_target_stride(&self, stride: usize) -> Self {
        let mut s = *self;
        s.dark_target_stride = stride;
        s
    }
}

/// [TaskingPolicy] selects how the constellation is tasked
/// over a zone of interest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TaskingPolicy {
    /// No tasking: a vessel is seen on the first pass that begins
    /// while it is present, reported without processing delay.
    Baseline,
    /// Wide area patrol over the entire zone
    Patrol,
    /// Focused tracking along known routes. Vessels off those routes
    /// are served by a coarser subset of the constellation.
    Tracking,
}

impl TaskingPolicy {
    /// Identifies a [TaskingPolicy] by name. Unknown names are a
    /// configuration error.
    /// ```
    /// use eezwatch::prelude::TaskingPolicy;
    ///
    /// assert_eq!(TaskingPolicy::from_name("patrol"), Ok(TaskingPolicy::Patrol));
    /// assert!(TaskingPolicy::from_name("loiter").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        name.trim()
            .parse::<Self>()
            .map_err(|_| ConfigurationError::UnknownPolicy(name.to_string()))
    }

    /// Resolves the [DetectionStrategy] this policy applies to a vessel,
    /// depending on whether that vessel sails a known route.
    pub fn strategy(&self, sensor: &SensorParams, on_known_route: bool) -> DetectionStrategy {
        match self {
            Self::Baseline => DetectionStrategy {
                processing_delay_s: 0.0,
                eligibility: Eligibility::All,
                selection: PassSelection::EarliestStart,
                overlap: OverlapRule::StartWithin,
            },
            Self::Patrol => DetectionStrategy {
                processing_delay_s: sensor.processing_delay_s,
                eligibility: Eligibility::All,
                selection: PassSelection::EarliestStart,
                overlap: OverlapRule::AnyOverlap,
            },
            Self::Tracking => {
                if on_known_route {
                    DetectionStrategy {
                        processing_delay_s: sensor.processing_delay_s
                            * sensor.tracking_delay_factor,
                        eligibility: Eligibility::All,
                        selection: PassSelection::EarliestStart,
                        overlap: OverlapRule::AnyOverlap,
                    }
                } else {
                    DetectionStrategy {
                        processing_delay_s: sensor.processing_delay_s,
                        eligibility: Eligibility::EveryNth(sensor.dark_target_stride),
                        selection: PassSelection::FirstListed,
                        overlap: OverlapRule::AnyOverlap,
                    }
                }
            },
        }
    }
}

/// Which satellites may contribute a detection
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Eligibility {
    /// Every satellite
    All,
    /// Satellites whose zero based index is a multiple of this stride
    EveryNth(usize),
}

impl Eligibility {
    /// True if this satellite may contribute a detection.
    /// A null stride admits nobody.
    pub fn admits(&self, satellite: SatelliteIndex) -> bool {
        match self {
            Self::All => true,
            Self::EveryNth(0) => false,
            Self::EveryNth(stride) => satellite.0 % stride == 0,
        }
    }
}

/// Which of its overlapping passes a satellite contributes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PassSelection {
    /// Pass with earliest start, ties broken by input order
    EarliestStart,
    /// First overlapping pass in input order, whatever its start
    FirstListed,
}

/// Which passes qualify for a vessel presence
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverlapRule {
    /// Any temporal overlap, see [crate::interval::overlaps]
    AnyOverlap,
    /// Pass must begin while vessel is present, see [crate::interval::starts_within]
    StartWithin,
}

/// [DetectionStrategy] is a fully resolved tasking policy,
/// as applied by the detection engine.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectionStrategy {
    /// Delay added to the winning pass (s), never negative
    pub processing_delay_s: f64,
    pub eligibility: Eligibility,
    pub selection: PassSelection,
    pub overlap: OverlapRule,
}

impl Default for DetectionStrategy {
    /// Patrol with default [SensorParams]
    fn default() -> Self {
        TaskingPolicy::Patrol.strategy(&SensorParams::default(), true)
    }
}

impl DetectionStrategy {
    /// Returns a new [DetectionStrategy] with desired processing delay (s).
    /// Negative delays are clamped to zero.
    pub fn with_processing_delay_s(&self, delay_s: f64) -> Self {
        let mut s = *self;
        s.processing_delay_s = delay_s.max(0.0);
        s
    }

    /// Returns a new [DetectionStrategy] with desired [Eligibility]
    pub fn with_eligibility(&self, eligibility: Eligibility) -> Self {
        let mut s = *self;
        s.eligibility = eligibility;
        s
    }

    /// Returns a new [DetectionStrategy] with desired [PassSelection]
    pub fn with_selection(&self, selection: PassSelection) -> Self {
        let mut s = *self;
        s.selection = selection;
        s
    }

    /// Returns a new [DetectionStrategy] with desired [OverlapRule]
    pub fn with_overlap(&self, overlap: OverlapRule) -> Self {
        let mut s = *self;
        s.overlap = overlap;
        s
    }
}
