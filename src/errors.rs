use thiserror::Error;

use crate::interval::SatelliteIndex;

/// Errors raised by the access-window engines when an input
/// breaks an interval invariant. Engines never reorder or repair
/// corrupted intervals, they reject them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Interval closes before it opens
    #[error("invalid interval: stop {stop_s}s precedes start {start_s}s")]
    InvalidInterval { start_s: f64, stop_s: f64 },
    /// Declared duration disagrees with stop - start
    #[error("duration mismatch: declared {declared_s}s, computed {computed_s}s")]
    DurationMismatch { declared_s: f64, computed_s: f64 },
    /// NaN or infinite timestamp
    #[error("non finite timestamp")]
    NonFiniteTime,
    /// Satellite index does not exist in this constellation
    #[error("satellite index {index} out of range (constellation of {count})")]
    SatelliteOutOfRange { index: SatelliteIndex, count: usize },
}

/// Caller side configuration errors. These are programming errors
/// and are surfaced immediately rather than defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown zone \"{0}\"")]
    UnknownZone(String),
    #[error("unknown vessel \"{0}\"")]
    UnknownVessel(String),
    #[error("unknown ground station \"{0}\"")]
    UnknownGroundStation(String),
    #[error("unknown constellation \"{0}\"")]
    UnknownConstellation(String),
    #[error("unknown tasking policy \"{0}\"")]
    UnknownPolicy(String),
    /// Vessel is registered but never transits that zone
    #[error("vessel \"{vessel}\" has no presence in zone \"{zone}\"")]
    NoPresence { vessel: String, zone: String },
    #[error("constellation must contain at least one satellite")]
    InvalidSatelliteCount,
    #[error("interval error: {0}")]
    Interval(#[from] Error),
}

/// Access report parsing errors
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid timestamp \"{0}\"")]
    TimestampFormat(String),
    #[error("invalid month name \"{0}\"")]
    MonthName(String),
    #[error("failed to parse \"{0}\" as float")]
    FloatParsing(String),
    #[error("missing column in access row")]
    MissingColumn,
    #[error("block {0} does not exist in this report")]
    MissingBlock(usize),
    #[error("interval error: {0}")]
    Interval(#[from] Error),
}

/// Result table formatting errors
#[derive(Debug, Error)]
pub enum FormattingError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
