#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod constellation;
pub mod delivery;
pub mod detection;
pub mod epoch;
pub mod errors;
pub mod interval;
pub mod policy;
pub mod report;
pub mod revisit;
pub mod scenario;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::{
        constellation::{pass_table, ConstellationConfig, PassTable},
        delivery::{deliver, deliver_detection, DeliveryOutcome, DeliveryResult, RelayMode},
        detection::{detect, DetectionOutcome, DetectionResult},
        epoch::{default_scenario_epoch, epoch_at, parse_utcg, seconds_since},
        errors::{ConfigurationError, Error, FormattingError, ParsingError},
        interval::{overlaps, starts_within, AccessInterval, SatelliteIndex, Span, VesselPresence},
        policy::{
            DetectionStrategy, Eligibility, OverlapRule, PassSelection, SensorParams, TaskingPolicy,
        },
        report::AccessReport,
        revisit::{coverage_gaps, merged_coverage, percentile, revisit_stats, RevisitStats},
        scenario::{ConstellationRun, LatencyRecord, RevisitRecord, Scenario, ScenarioReport},
    };
    // pub re-export
    pub use hifitime::prelude::{Duration, Epoch, TimeScale};
}
