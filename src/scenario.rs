//! Scenario driver: evaluates every (constellation, vessel, zone, policy) tuple
use std::collections::BTreeSet;

use hifitime::prelude::Epoch;
use itertools::Itertools;
use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    constellation::ConstellationConfig,
    delivery::{deliver_detection, DeliveryOutcome, RelayMode},
    detection::{detect, DetectionOutcome},
    epoch::{default_scenario_epoch, epoch_at},
    errors::ConfigurationError,
    interval::{AccessInterval, VesselPresence},
    policy::{SensorParams, TaskingPolicy},
    revisit::{revisit_stats, RevisitStats},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One constellation under study, with the relay capability it is evaluated with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstellationRun {
    pub config: ConstellationConfig,
    pub relay: RelayMode,
}

/// [LatencyRecord] gathers the outcome of one
/// (constellation, vessel, zone, policy) tuple.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatencyRecord {
    pub constellation: String,
    pub satellite_count: usize,
    pub vessel_id: String,
    pub zone_id: String,
    pub policy: TaskingPolicy,
    pub relay: RelayMode,
    /// Zone entry (s)
    pub entry_s: f64,
    pub detection: DetectionOutcome,
    /// Delivery is not attempted for undetected vessels
    pub delivery: Option<DeliveryOutcome>,
}

impl LatencyRecord {
    /// True if vessel was detected
    pub fn detected(&self) -> bool {
        self.detection.is_detected()
    }

    /// Detection latency (s), if detected
    pub fn detect_latency_s(&self) -> Option<f64> {
        self.detection.latency_s()
    }

    /// Delivery latency (s), if detected and delivered
    pub fn delivery_latency_s(&self) -> Option<f64> {
        self.delivery.as_ref().and_then(|delivery| delivery.latency_s())
    }

    /// Entry to ground latency (s): detection plus delivery latency
    pub fn total_latency_s(&self) -> Option<f64> {
        Some(self.detect_latency_s()? + self.delivery_latency_s()?)
    }

    /// Absolute detection [Epoch], if detected
    pub fn detect_epoch(&self, scenario_epoch: Epoch) -> Option<Epoch> {
        self.detection
            .result()
            .map(|result| epoch_at(scenario_epoch, result.detect_s))
    }

    /// Absolute downlink [Epoch], if delivered
    pub fn downlink_epoch(&self, scenario_epoch: Epoch) -> Option<Epoch> {
        self.delivery
            .as_ref()
            .and_then(|delivery| delivery.result())
            .map(|result| epoch_at(scenario_epoch, result.downlink_s))
    }
}

/// [RevisitRecord] gathers the revisit statistics of one zone,
/// for one constellation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RevisitRecord {
    pub constellation: String,
    pub satellite_count: usize,
    pub zone_id: String,
    /// None when the zone has no access window at all
    pub stats: Option<RevisitStats>,
}

/// [ScenarioReport] is the result of a [Scenario] run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScenarioReport {
    /// Scenario epoch all instants refer to
    pub epoch: Epoch,
    pub latency: Vec<LatencyRecord>,
    pub revisit: Vec<RevisitRecord>,
}

impl ScenarioReport {
    /// Iterates over the [LatencyRecord]s of one constellation
    pub fn constellation_latency<'a>(
        &'a self,
        constellation: &'a str,
    ) -> impl Iterator<Item = &'a LatencyRecord> + 'a {
        self.latency
            .iter()
            .filter(move |record| record.constellation == constellation)
    }

    /// Iterates over the [LatencyRecord]s of one policy
    pub fn policy_latency(&self, policy: TaskingPolicy) -> impl Iterator<Item = &LatencyRecord> + '_ {
        self.latency
            .iter()
            .filter(move |record| record.policy == policy)
    }

    /// Fraction of detected tuples for this policy, None if policy was not evaluated
    pub fn detection_rate(&self, policy: TaskingPolicy) -> Option<f64> {
        let (total, detected) = self
            .policy_latency(policy)
            .fold((0, 0), |(total, detected), record| {
                (total + 1, detected + record.detected() as usize)
            });
        if total == 0 {
            None
        } else {
            Some(detected as f64 / total as f64)
        }
    }
}

/// [Scenario] describes one complete analysis run: the constellations
/// under study, the vessel transits, the tasking policies and the
/// epoch every instant refers to. It is immutable once built: the
/// `with_` methods return modified copies, and several scenarios
/// (for example with different epochs) may coexist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scenario {
    epoch: Epoch,
    sensor: SensorParams,
    constellations: Vec<ConstellationRun>,
    transits: Vec<VesselPresence>,
    known_routes: BTreeSet<String>,
    policies: Vec<TaskingPolicy>,
}

impl Default for Scenario {
    /// Empty [Scenario] at the default scenario epoch,
    /// with default [SensorParams], comparing Patrol and Tracking.
    fn default() -> Self {
        Self {
            epoch: default_scenario_epoch(),
            sensor: SensorParams::default(),
            constellations: Vec::new(),
            transits: Vec::new(),
            known_routes: BTreeSet::new(),
            policies: vec![TaskingPolicy::Patrol, TaskingPolicy::Tracking],
        }
    }
}

impl Scenario {
    /// Scenario epoch
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// [SensorParams] in use
    pub fn sensor(&self) -> &SensorParams {
        &self.sensor
    }

    /// Policies evaluated
    pub fn policies(&self) -> &[TaskingPolicy] {
        &self.policies
    }

    /// Returns a new [Scenario] with desired epoch
    pub fn with_epoch(&self, epoch: Epoch) -> Self {
        let mut s = self.clone();
        s.epoch = epoch;
        s
    }

    /// Returns a new [Scenario] with desired [SensorParams]
    pub fn with_sensor(&self, sensor: SensorParams) -> Self {
        let mut s = self.clone();
        s.sensor = sensor;
        s
    }

    /// Returns a new [Scenario] evaluating desired policies, in this order.
    pub fn with_policies(&self, policies: &[TaskingPolicy]) -> Self {
        let mut s = self.clone();
        s.policies = policies.iter().copied().unique().collect();
        s
    }

    /// Returns a new [Scenario] with one more constellation under study.
    /// A constellation of the same name is replaced.
    pub fn with_constellation(&self, config: ConstellationConfig, relay: RelayMode) -> Self {
        let mut s = self.clone();
        s.constellations.retain(|run| run.config.name != config.name);
        s.constellations.push(ConstellationRun { config, relay });
        s
    }

    /// Returns a new [Scenario] with one more vessel transit.
    pub fn with_transit(&self, transit: VesselPresence) -> Self {
        let mut s = self.clone();
        s.transits.push(transit);
        s
    }

    /// Returns a new [Scenario] where this vessel sails a known route.
    pub fn with_known_route(&self, vessel_id: &str) -> Self {
        let mut s = self.clone();
        s.known_routes.insert(vessel_id.to_string());
        s
    }

    /// True if this vessel sails a known route
    pub fn on_known_route(&self, vessel_id: &str) -> bool {
        self.known_routes.contains(vessel_id)
    }

    /// Iterates over constellations under study
    pub fn constellations(&self) -> impl Iterator<Item = &ConstellationRun> + '_ {
        self.constellations.iter()
    }

    /// Returns the constellation of that name
    pub fn constellation(&self, name: &str) -> Result<&ConstellationRun, ConfigurationError> {
        self.constellations
            .iter()
            .find(|run| run.config.name == name)
            .ok_or_else(|| ConfigurationError::UnknownConstellation(name.to_string()))
    }

    /// Returns every registered (vessel, zone) pair, in registration order
    pub fn vessel_zones(&self) -> Vec<(&str, &str)> {
        self.transits
            .iter()
            .map(|transit| (transit.vessel_id.as_str(), transit.zone_id.as_str()))
            .unique()
            .collect()
    }

    /// Returns the authoritative presence of this vessel in this zone.
    /// When several transits are registered, the first one chronologically is used.
    pub fn presence(&self, vessel_id: &str, zone_id: &str) -> Result<&VesselPresence, ConfigurationError> {
        if !self.transits.iter().any(|t| t.vessel_id == vessel_id) {
            return Err(ConfigurationError::UnknownVessel(vessel_id.to_string()));
        }

        let transits = self
            .transits
            .iter()
            .filter(|t| t.vessel_id == vessel_id && t.zone_id == zone_id)
            .collect::<Vec<_>>();

        if transits.len() > 1 {
            warn!(
                "{}({}) - {} transits, using the first one",
                vessel_id,
                zone_id,
                transits.len()
            );
        }

        VesselPresence::first_chronological(transits).ok_or_else(|| ConfigurationError::NoPresence {
            vessel: vessel_id.to_string(),
            zone: zone_id.to_string(),
        })
    }

    /// Evaluates one (constellation, vessel, zone, policy) tuple.
    pub fn evaluate(
        &self,
        constellation: &str,
        vessel_id: &str,
        zone_id: &str,
        policy: TaskingPolicy,
    ) -> Result<LatencyRecord, ConfigurationError> {
        let run = self.constellation(constellation)?;
        let presence = self.presence(vessel_id, zone_id)?;
        let downlinks = run.config.downlink_windows();
        self.evaluate_run(run, &downlinks, presence, policy)
    }

    fn evaluate_run(
        &self,
        run: &ConstellationRun,
        downlinks: &[AccessInterval],
        presence: &VesselPresence,
        policy: TaskingPolicy,
    ) -> Result<LatencyRecord, ConfigurationError> {
        let passes = run.config.zone_passes(&presence.zone_id)?;

        let strategy = policy.strategy(&self.sensor, self.on_known_route(&presence.vessel_id));

        let detection = detect(presence, &passes, &strategy)?;

        let delivery = match detection.result() {
            Some(result) => Some(deliver_detection(result, downlinks, run.relay)?),
            None => None,
        };

        debug!(
            "{} {} {}({}) - detection: {:?}s delivery: {:?}s",
            run.config.name,
            policy,
            presence.vessel_id,
            presence.zone_id,
            detection.latency_s(),
            delivery.as_ref().and_then(|d| d.latency_s()),
        );

        Ok(LatencyRecord {
            constellation: run.config.name.clone(),
            satellite_count: run.config.satellite_count(),
            vessel_id: presence.vessel_id.clone(),
            zone_id: presence.zone_id.clone(),
            policy,
            relay: run.relay,
            entry_s: presence.entry_s(),
            detection,
            delivery,
        })
    }

    /// Computes the revisit statistics of one zone, for one constellation.
    pub fn revisit(&self, constellation: &str, zone_id: &str) -> Result<RevisitRecord, ConfigurationError> {
        let run = self.constellation(constellation)?;
        self.revisit_run(run, zone_id)
    }

    fn revisit_run(&self, run: &ConstellationRun, zone_id: &str) -> Result<RevisitRecord, ConfigurationError> {
        let windows = run.config.zone_windows(zone_id)?;
        Ok(RevisitRecord {
            constellation: run.config.name.clone(),
            satellite_count: run.config.satellite_count(),
            zone_id: zone_id.to_string(),
            stats: revisit_stats(zone_id, windows)?,
        })
    }

    /// Evaluates every (constellation, vessel, zone, policy) tuple,
    /// and the revisit statistics of every (constellation, zone) pair.
    /// Records are sorted by constellation, then vessel registration order, then policy.
    /// Any configuration error aborts the run.
    pub fn run(&self) -> Result<ScenarioReport, ConfigurationError> {
        // downlink windows do not depend on the tuple
        let downlinks = self
            .constellations
            .iter()
            .map(|run| run.config.downlink_windows())
            .collect::<Vec<_>>();

        let mut tuples = Vec::new();
        for (run, downlinks) in self.constellations.iter().zip(downlinks.iter()) {
            for (vessel_id, zone_id) in self.vessel_zones() {
                let presence = self.presence(vessel_id, zone_id)?;
                for policy in self.policies.iter() {
                    tuples.push((run, downlinks.as_slice(), presence, *policy));
                }
            }
        }

        info!(
            "evaluating {} tuples over {} constellation(s)",
            tuples.len(),
            self.constellations.len()
        );

        #[cfg(feature = "parallel")]
        let latency = tuples
            .par_iter()
            .map(|(run, downlinks, presence, policy)| {
                self.evaluate_run(run, downlinks, presence, *policy)
            })
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let latency = tuples
            .iter()
            .map(|(run, downlinks, presence, policy)| {
                self.evaluate_run(run, downlinks, presence, *policy)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut revisit = Vec::new();
        for run in self.constellations.iter() {
            for zone_id in run.config.zone_ids() {
                revisit.push(self.revisit_run(run, zone_id)?);
            }
        }

        Ok(ScenarioReport {
            epoch: self.epoch,
            latency,
            revisit,
        })
    }
}
