//! Constellation description: zone and ground station access windows
use std::collections::BTreeMap;

use log::debug;

use crate::{
    errors::{ConfigurationError, Error},
    interval::{AccessInterval, SatelliteIndex},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Access windows sorted per satellite. Each list retains input order,
/// which is meaningful for the first-listed selection rule.
pub type PassTable = BTreeMap<SatelliteIndex, Vec<AccessInterval>>;

/// [ConstellationConfig] describes one constellation under study:
/// its size and every access window it offers, over every zone
/// of interest and toward every ground station.
/// It is immutable once built: the `with_` methods return modified copies.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstellationConfig {
    /// Name of this constellation, for example "Walker12"
    pub name: String,
    /// Number of satellites
    satellite_count: usize,
    /// Zone to satellite access windows, per zone
    zone_access: BTreeMap<String, Vec<AccessInterval>>,
    /// Ground station to satellite access windows, per ground station
    ground_access: BTreeMap<String, Vec<AccessInterval>>,
}

impl ConstellationConfig {
    /// Creates an empty [ConstellationConfig] of `satellite_count` satellites.
    /// ```
    /// use eezwatch::prelude::ConstellationConfig;
    ///
    /// let walker = ConstellationConfig::new("Walker12", 12)
    ///     .unwrap();
    /// assert_eq!(walker.satellite_count(), 12);
    ///
    /// assert!(ConstellationConfig::new("Empty", 0).is_err());
    /// ```
    pub fn new(name: &str, satellite_count: usize) -> Result<Self, ConfigurationError> {
        if satellite_count == 0 {
            return Err(ConfigurationError::InvalidSatelliteCount);
        }
        Ok(Self {
            name: name.to_string(),
            satellite_count,
            zone_access: Default::default(),
            ground_access: Default::default(),
        })
    }

    /// Number of satellites in this constellation
    pub const fn satellite_count(&self) -> usize {
        self.satellite_count
    }

    /// Returns a new [ConstellationConfig] with access windows over a zone.
    /// Windows are appended, in order, to possible existing windows of that zone.
    pub fn with_zone_access(
        &self,
        zone_id: &str,
        windows: &[AccessInterval],
    ) -> Result<Self, ConfigurationError> {
        self.validate_windows(windows)?;
        let mut s = self.clone();
        s.zone_access
            .entry(zone_id.to_string())
            .or_default()
            .extend_from_slice(windows);
        debug!("{} - {}: {} zone windows", self.name, zone_id, windows.len());
        Ok(s)
    }

    /// Returns a new [ConstellationConfig] with downlink windows toward a ground station.
    pub fn with_ground_access(
        &self,
        station_id: &str,
        windows: &[AccessInterval],
    ) -> Result<Self, ConfigurationError> {
        self.validate_windows(windows)?;
        let mut s = self.clone();
        s.ground_access
            .entry(station_id.to_string())
            .or_default()
            .extend_from_slice(windows);
        debug!("{} - {}: {} downlink windows", self.name, station_id, windows.len());
        Ok(s)
    }

    fn validate_windows(&self, windows: &[AccessInterval]) -> Result<(), Error> {
        for window in windows.iter() {
            window.validate()?;
            if window.subject.0 >= self.satellite_count {
                return Err(Error::SatelliteOutOfRange {
                    index: window.subject,
                    count: self.satellite_count,
                });
            }
        }
        Ok(())
    }

    /// Iterates over all zones this constellation has windows for.
    pub fn zone_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.zone_access.keys().map(|k| k.as_str())
    }

    /// Iterates over all ground stations this constellation has windows for.
    pub fn ground_station_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.ground_access.keys().map(|k| k.as_str())
    }

    /// True if this constellation knows this zone
    pub fn has_zone(&self, zone_id: &str) -> bool {
        self.zone_access.contains_key(zone_id)
    }

    /// Returns every access window over this zone, all satellites mixed.
    pub fn zone_windows(&self, zone_id: &str) -> Result<&[AccessInterval], ConfigurationError> {
        self.zone_access
            .get(zone_id)
            .map(|windows| windows.as_slice())
            .ok_or_else(|| ConfigurationError::UnknownZone(zone_id.to_string()))
    }

    /// Returns every downlink window toward this ground station.
    pub fn ground_windows(&self, station_id: &str) -> Result<&[AccessInterval], ConfigurationError> {
        self.ground_access
            .get(station_id)
            .map(|windows| windows.as_slice())
            .ok_or_else(|| ConfigurationError::UnknownGroundStation(station_id.to_string()))
    }

    /// Returns the zone windows, sorted per satellite.
    pub fn zone_passes(&self, zone_id: &str) -> Result<PassTable, ConfigurationError> {
        let windows = self.zone_windows(zone_id)?;
        Ok(pass_table(windows.iter()))
    }

    /// Returns the downlink windows of all ground stations, all satellites mixed:
    /// ground station after ground station (by name), each in report order.
    pub fn downlink_windows(&self) -> Vec<AccessInterval> {
        self.ground_access.values().flatten().copied().collect()
    }
}

/// Groups windows per satellite, retaining input order within each group.
pub fn pass_table<'a, I>(windows: I) -> PassTable
where
    I: IntoIterator<Item = &'a AccessInterval>,
{
    let mut table = PassTable::new();
    for window in windows {
        table.entry(window.subject).or_default().push(*window);
    }
    table
}
