//! Access windows, vessel presence and the shared overlap primitives
use crate::errors::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximal tolerated disagreement between a declared duration
/// and stop - start, in seconds. Reports carry milliseconds.
pub const DURATION_TOLERANCE_S: f64 = 1.0E-2;

/// Zero based index of a satellite within its constellation
/// (or of a block within an access report).
/// Displayed one based, the way study tables number satellites.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteIndex(pub usize);

impl SatelliteIndex {
    /// One based satellite number
    pub const fn number(&self) -> usize {
        self.0 + 1
    }
}

impl std::fmt::Display for SatelliteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Sat{}", self.number())
    }
}

impl From<usize> for SatelliteIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Anything that spans a closed time range, expressed in
/// seconds elapsed since the scenario epoch.
pub trait Span {
    /// Opening instant (s)
    fn start_s(&self) -> f64;
    /// Closing instant (s)
    fn stop_s(&self) -> f64;
}

/// [AccessInterval] is a time range during which two entities
/// (satellite and zone, or satellite and ground station) see each other.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessInterval {
    /// Satellite (or report block) this window belongs to
    pub subject: SatelliteIndex,
    /// Window opening (s)
    pub start_s: f64,
    /// Window closing (s)
    pub stop_s: f64,
    /// Duration as declared by the data source (s).
    /// Redundant with stop - start, validated and never recomputed.
    pub duration_s: f64,
}

impl Span for AccessInterval {
    fn start_s(&self) -> f64 {
        self.start_s
    }
    fn stop_s(&self) -> f64 {
        self.stop_s
    }
}

impl AccessInterval {
    /// Builds a new [AccessInterval], whose duration is deduced from both instants.
    /// ```
    /// use eezwatch::prelude::{AccessInterval, SatelliteIndex};
    ///
    /// let pass = AccessInterval::new(SatelliteIndex(2), 100.0, 160.0)
    ///     .unwrap();
    /// assert_eq!(pass.duration_s, 60.0);
    /// assert_eq!(pass.subject.number(), 3);
    ///
    /// assert!(AccessInterval::new(SatelliteIndex(0), 10.0, 5.0).is_err());
    /// ```
    pub fn new(subject: SatelliteIndex, start_s: f64, stop_s: f64) -> Result<Self, Error> {
        Self::with_declared_duration(subject, start_s, stop_s, stop_s - start_s)
    }

    /// Builds a new [AccessInterval] carrying the duration declared by the
    /// data source. The declared duration must agree with stop - start
    /// within [DURATION_TOLERANCE_S].
    pub fn with_declared_duration(
        subject: SatelliteIndex,
        start_s: f64,
        stop_s: f64,
        duration_s: f64,
    ) -> Result<Self, Error> {
        let interval = Self {
            subject,
            start_s,
            stop_s,
            duration_s,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Verifies this [AccessInterval] is usable by the engines.
    pub fn validate(&self) -> Result<(), Error> {
        validate_span(self)?;

        let computed_s = self.stop_s - self.start_s;
        if !self.duration_s.is_finite() {
            return Err(Error::NonFiniteTime);
        }
        if (computed_s - self.duration_s).abs() > DURATION_TOLERANCE_S {
            return Err(Error::DurationMismatch {
                declared_s: self.duration_s,
                computed_s,
            });
        }
        Ok(())
    }

    /// Returns a copy of this [AccessInterval] attributed to another subject.
    pub fn with_subject(&self, subject: SatelliteIndex) -> Self {
        let mut s = *self;
        s.subject = subject;
        s
    }
}

/// [VesselPresence] is the single interval during which
/// a vessel is physically within a zone of interest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VesselPresence {
    pub vessel_id: String,
    pub zone_id: String,
    /// Zone entry (s)
    pub start_s: f64,
    /// Zone exit (s)
    pub stop_s: f64,
}

impl Span for VesselPresence {
    fn start_s(&self) -> f64 {
        self.start_s
    }
    fn stop_s(&self) -> f64 {
        self.stop_s
    }
}

impl VesselPresence {
    /// Builds a new [VesselPresence], rejecting reversed intervals.
    pub fn new(vessel_id: &str, zone_id: &str, start_s: f64, stop_s: f64) -> Result<Self, Error> {
        let presence = Self {
            vessel_id: vessel_id.to_string(),
            zone_id: zone_id.to_string(),
            start_s,
            stop_s,
        };
        validate_span(&presence)?;
        Ok(presence)
    }

    /// Zone entry instant (s)
    pub fn entry_s(&self) -> f64 {
        self.start_s
    }

    /// Zone exit instant (s)
    pub fn exit_s(&self) -> f64 {
        self.stop_s
    }

    /// Picks the authoritative transit among several transits of the same
    /// vessel through the same zone: the first one chronologically.
    /// Ties on the entry instant keep input order.
    pub fn first_chronological<'a, I>(transits: I) -> Option<&'a VesselPresence>
    where
        I: IntoIterator<Item = &'a VesselPresence>,
    {
        transits.into_iter().fold(None, |first, transit| match first {
            Some(first) if first.start_s <= transit.start_s => Some(first),
            _ => Some(transit),
        })
    }
}

/// Rejects non finite or reversed spans.
pub(crate) fn validate_span<S: Span + ?Sized>(span: &S) -> Result<(), Error> {
    let (start_s, stop_s) = (span.start_s(), span.stop_s());
    if !start_s.is_finite() || !stop_s.is_finite() {
        return Err(Error::NonFiniteTime);
    }
    if stop_s < start_s {
        return Err(Error::InvalidInterval { start_s, stop_s });
    }
    Ok(())
}

/// Closed interval overlap: true when both spans share at least one instant.
/// A pass that merely straddles (or touches) either boundary counts.
/// ```
/// use eezwatch::prelude::{overlaps, AccessInterval, SatelliteIndex, VesselPresence};
///
/// let ship = VesselPresence::new("Ship1", "EEZ_West", 100.0, 200.0)
///     .unwrap();
///
/// let touching = AccessInterval::new(SatelliteIndex(0), 50.0, 100.0)
///     .unwrap();
/// assert!(overlaps(&ship, &touching));
///
/// let disjoint = AccessInterval::new(SatelliteIndex(0), 201.0, 260.0)
///     .unwrap();
/// assert!(!overlaps(&ship, &disjoint));
/// ```
pub fn overlaps<A: Span + ?Sized, B: Span + ?Sized>(presence: &A, pass: &B) -> bool {
    pass.start_s() <= presence.stop_s() && pass.stop_s() >= presence.start_s()
}

/// Narrow variant used by the baseline (non tasking) detection:
/// the pass must begin while the vessel is present, `entry <= pass.start <= exit`.
/// Passes already in progress at entry do not qualify.
pub fn starts_within<A: Span + ?Sized, B: Span + ?Sized>(presence: &A, pass: &B) -> bool {
    presence.start_s() <= pass.start_s() && pass.start_s() <= presence.stop_s()
}

#[cfg(test)]
mod test {
    use super::*;

    fn pass(start_s: f64, stop_s: f64) -> AccessInterval {
        AccessInterval::new(SatelliteIndex(0), start_s, stop_s).unwrap()
    }

    #[test]
    fn overlap_truth_table() {
        let ship = VesselPresence::new("Ship1", "EEZ_West", 100.0, 200.0).unwrap();

        // touching endpoints
        assert!(overlaps(&ship, &pass(50.0, 100.0)));
        assert!(overlaps(&ship, &pass(200.0, 250.0)));
        // containment, both ways
        assert!(overlaps(&ship, &pass(120.0, 180.0)));
        assert!(overlaps(&ship, &pass(0.0, 500.0)));
        // straddling
        assert!(overlaps(&ship, &pass(90.0, 110.0)));
        assert!(overlaps(&ship, &pass(190.0, 210.0)));
        // disjoint
        assert!(!overlaps(&ship, &pass(0.0, 99.9)));
        assert!(!overlaps(&ship, &pass(200.1, 300.0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = pass(10.0, 20.0);
        for (start, stop) in [(0.0, 10.0), (20.0, 30.0), (12.0, 15.0), (0.0, 9.0), (21.0, 22.0)] {
            let b = pass(start, stop);
            assert_eq!(overlaps(&a, &b), overlaps(&b, &a), "[{}, {}]", start, stop);
        }
    }

    #[test]
    fn start_within_is_narrower() {
        let ship = VesselPresence::new("Ship3", "EEZ_West", 100.0, 200.0).unwrap();

        // already in progress at entry
        let early = pass(90.0, 110.0);
        assert!(overlaps(&ship, &early));
        assert!(!starts_within(&ship, &early));

        // boundaries are inclusive
        assert!(starts_within(&ship, &pass(100.0, 110.0)));
        assert!(starts_within(&ship, &pass(200.0, 210.0)));
        assert!(!starts_within(&ship, &pass(200.5, 210.0)));
    }

    #[test]
    fn interval_validation() {
        assert_eq!(
            AccessInterval::new(SatelliteIndex(1), 10.0, 5.0),
            Err(Error::InvalidInterval {
                start_s: 10.0,
                stop_s: 5.0
            })
        );
        assert_eq!(
            AccessInterval::new(SatelliteIndex(1), f64::NAN, 5.0),
            Err(Error::NonFiniteTime)
        );

        assert!(AccessInterval::with_declared_duration(SatelliteIndex(0), 0.0, 60.0, 60.004).is_ok());

        assert_eq!(
            AccessInterval::with_declared_duration(SatelliteIndex(0), 0.0, 60.0, 61.0),
            Err(Error::DurationMismatch {
                declared_s: 61.0,
                computed_s: 60.0
            })
        );

        // zero length windows are legal
        assert!(AccessInterval::new(SatelliteIndex(0), 5.0, 5.0).is_ok());
        assert!(VesselPresence::new("Ship2", "EEZ_East", 5.0, 4.0).is_err());
    }

    #[test]
    fn first_chronological_transit() {
        let transits = vec![
            VesselPresence::new("Ship1", "EEZ_West", 500.0, 900.0).unwrap(),
            VesselPresence::new("Ship1", "EEZ_West", 100.0, 200.0).unwrap(),
            VesselPresence::new("Ship1", "EEZ_West", 100.0, 300.0).unwrap(),
        ];
        let first = VesselPresence::first_chronological(&transits).unwrap();
        assert_eq!(first.start_s, 100.0);
        assert_eq!(first.stop_s, 200.0);

        let none: Vec<VesselPresence> = Vec::new();
        assert!(VesselPresence::first_chronological(&none).is_none());
    }

    #[test]
    fn satellite_numbering() {
        assert_eq!(SatelliteIndex(0).number(), 1);
        assert_eq!(SatelliteIndex(11).to_string(), "Sat12");
    }
}
