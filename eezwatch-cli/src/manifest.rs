//! Scenario manifest
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};
use serde::Deserialize;

use eezwatch::prelude::{
    default_scenario_epoch, AccessReport, ConstellationConfig, Epoch, RelayMode, Scenario,
    SensorParams, TaskingPolicy,
};

use crate::Error;

fn default_policies() -> Vec<String> {
    vec!["PATROL".to_string(), "TRACKING".to_string()]
}

fn default_relay() -> String {
    RelayMode::default().to_string()
}

/// Sensor section, every field falls back to [SensorParams::default]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorSection {
    pub processing_delay_s: Option<f64>,
    pub tracking_delay_factor: Option<f64>,
    pub dark_target_stride: Option<usize>,
}

impl SensorSection {
    fn sensor(&self) -> SensorParams {
        let mut sensor = SensorParams::default();
        if let Some(delay_s) = self.processing_delay_s {
            sensor = sensor.with_processing_delay_s(delay_s);
        }
        if let Some(factor) = self.tracking_delay_factor {
            sensor = sensor.with_tracking_delay_factor(factor);
        }
        if let Some(stride) = self.dark_target_stride {
            sensor = sensor.with_dark_target_stride(stride);
        }
        sensor
    }
}

/// One constellation: one access report per zone and per ground station.
/// Block `k` of each report describes satellite `k`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstellationSection {
    pub name: String,
    pub satellites: usize,
    #[serde(default = "default_relay")]
    pub relay: String,
    #[serde(default)]
    pub zones: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub ground_stations: BTreeMap<String, PathBuf>,
}

/// One vessel transit, read from one block of a vessel/zone report
#[derive(Debug, Clone, Deserialize)]
pub struct VesselSection {
    pub id: String,
    pub zone: String,
    pub report: PathBuf,
    #[serde(default)]
    pub block: usize,
    #[serde(default)]
    pub known_route: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Scenario epoch, defaults to 2026-01-01T00:00:00 UTC
    pub epoch: Option<String>,
    #[serde(default = "default_policies")]
    pub policies: Vec<String>,
    #[serde(default)]
    pub sensor: SensorSection,
    #[serde(default, rename = "constellation")]
    pub constellations: Vec<ConstellationSection>,
    #[serde(default, rename = "vessel")]
    pub vessels: Vec<VesselSection>,
    /// Reports are resolved relative to this directory
    #[serde(skip)]
    root: PathBuf,
}

/// Parses an access report. Constellation reports are limited to
/// their first `n_blocks` blocks (one per satellite).
fn parse_report(path: &Path, epoch: Epoch, n_blocks: Option<usize>) -> Result<AccessReport, Error> {
    debug!("parsing {}", path.display());
    let gzip = path.extension().map(|ext| ext == "gz").unwrap_or(false);
    let report = match (gzip, n_blocks) {
        (true, Some(n)) => AccessReport::from_gzip_file_first_blocks(path, epoch, n),
        (true, None) => AccessReport::from_gzip_file(path, epoch),
        (false, Some(n)) => AccessReport::from_file_first_blocks(path, epoch, n),
        (false, None) => AccessReport::from_file(path, epoch),
    };
    report.map_err(|source| Error::Report {
        path: path.to_path_buf(),
        source,
    })
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let mut manifest: Manifest = toml::from_str(&content)?;
        manifest.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    pub fn epoch(&self) -> Result<Epoch, Error> {
        match &self.epoch {
            Some(epoch) => Epoch::from_str(epoch.trim())
                .map_err(|e| Error::Epoch(epoch.to_string(), e.to_string())),
            None => Ok(default_scenario_epoch()),
        }
    }

    pub fn policies(&self) -> Result<Vec<TaskingPolicy>, Error> {
        let policies = self
            .policies
            .iter()
            .map(|name| TaskingPolicy::from_name(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(policies)
    }

    fn constellation(
        &self,
        section: &ConstellationSection,
        epoch: Epoch,
    ) -> Result<ConstellationConfig, Error> {
        let mut config = ConstellationConfig::new(&section.name, section.satellites)?;

        for (zone_id, path) in section.zones.iter() {
            let report = parse_report(&self.root.join(path), epoch, Some(section.satellites))?;
            config = config.with_zone_access(zone_id, &report.intervals(section.satellites))?;
        }

        for (station_id, path) in section.ground_stations.iter() {
            let report = parse_report(&self.root.join(path), epoch, Some(section.satellites))?;
            config =
                config.with_ground_access(station_id, &report.intervals(section.satellites))?;
        }

        Ok(config)
    }

    /// Builds the [Scenario] this manifest describes.
    /// Only the `selected` constellations are loaded, all of them when empty.
    pub fn scenario(&self, selected: &[String]) -> Result<Scenario, Error> {
        let epoch = self.epoch()?;

        let mut scenario = Scenario::default()
            .with_epoch(epoch)
            .with_sensor(self.sensor.sensor())
            .with_policies(&self.policies()?);

        for name in selected.iter() {
            if !self.constellations.iter().any(|c| &c.name == name) {
                return Err(Error::UnknownConstellation(name.to_string()));
            }
        }

        for section in self.constellations.iter() {
            if !selected.is_empty() && !selected.contains(&section.name) {
                continue;
            }
            let relay = RelayMode::from_str(&section.relay)
                .map_err(|_| Error::RelayMode(section.relay.to_string()))?;
            let config = self.constellation(section, epoch)?;
            info!(
                "{} - {} satellites, {} zone(s), {} ground station(s), {} relay",
                config.name,
                config.satellite_count(),
                config.zone_ids().count(),
                config.ground_station_ids().count(),
                relay
            );
            scenario = scenario.with_constellation(config, relay);
        }

        for vessel in self.vessels.iter() {
            let report = parse_report(&self.root.join(&vessel.report), epoch, None)?;
            let transits = report
                .vessel_transits(vessel.block, &vessel.id, &vessel.zone)
                .map_err(|source| Error::Report {
                    path: vessel.report.clone(),
                    source,
                })?;
            for transit in transits {
                scenario = scenario.with_transit(transit);
            }
            if vessel.known_route {
                scenario = scenario.with_known_route(&vessel.id);
            }
        }

        Ok(scenario)
    }
}
