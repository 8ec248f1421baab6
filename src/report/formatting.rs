//! Result tables, as CSV
use std::io::Write;

use crate::{
    errors::FormattingError,
    scenario::{LatencyRecord, RevisitRecord, ScenarioReport},
};

fn seconds(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.3}", value),
        None => String::new(),
    }
}

fn minutes(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.3}", value / 60.0),
        None => String::new(),
    }
}

fn latency_row(record: &LatencyRecord) -> Vec<String> {
    let detection = record.detection.result();
    let delivery = record
        .delivery
        .as_ref()
        .and_then(|delivery| delivery.result());

    vec![
        record.constellation.clone(),
        record.satellite_count.to_string(),
        record.vessel_id.clone(),
        record.zone_id.clone(),
        record.policy.to_string(),
        record.relay.to_string(),
        format!("{:.3}", record.entry_s),
        seconds(detection.map(|d| d.detect_s)),
        detection
            .map(|d| d.detecting_satellite.number().to_string())
            .unwrap_or_default(),
        delivery
            .map(|d| d.downlink_satellite.number().to_string())
            .unwrap_or_default(),
        seconds(delivery.map(|d| d.downlink_s)),
        seconds(record.detect_latency_s()),
        seconds(record.delivery_latency_s()),
        seconds(record.total_latency_s()),
        (record.detected() as u8).to_string(),
        (delivery.is_some() as u8).to_string(),
    ]
}

fn revisit_row(record: &RevisitRecord, to_minutes: bool) -> Vec<String> {
    let format: fn(Option<f64>) -> String = if to_minutes { minutes } else { seconds };
    let stats = record.stats.as_ref();
    vec![
        record.constellation.clone(),
        record.satellite_count.to_string(),
        record.zone_id.clone(),
        format(stats.map(|s| s.mean_gap_s)),
        format(stats.map(|s| s.median_gap_s)),
        format(stats.map(|s| s.p95_gap_s)),
        format(stats.map(|s| s.max_gap_s)),
        stats.map(|s| s.gap_count.to_string()).unwrap_or_default(),
    ]
}

impl ScenarioReport {
    /// Formats one row per (constellation, vessel, zone, policy) tuple.
    /// Undetected or undelivered tuples are reported with empty cells.
    /// Satellites are numbered from 1.
    pub fn format_latency<W: Write>(&self, writer: W) -> Result<(), FormattingError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "constellation",
            "satellites",
            "ship_id",
            "eez",
            "mode",
            "relay",
            "t_entry_s",
            "t_detect_s",
            "sat_detect",
            "sat_downlink",
            "t_downlink_s",
            "detect_latency_s",
            "delivery_latency_s",
            "total_latency_s",
            "detected",
            "delivered",
        ])?;
        for record in self.latency.iter() {
            csv.write_record(latency_row(record))?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Formats one row per (constellation, zone) pair, in seconds.
    pub fn format_revisit<W: Write>(&self, writer: W) -> Result<(), FormattingError> {
        self.format_revisit_table(writer, false)
    }

    /// Formats the cross constellation revisit comparison, in minutes.
    pub fn format_revisit_comparison<W: Write>(&self, writer: W) -> Result<(), FormattingError> {
        self.format_revisit_table(writer, true)
    }

    fn format_revisit_table<W: Write>(&self, writer: W, to_minutes: bool) -> Result<(), FormattingError> {
        let mut csv = csv::Writer::from_writer(writer);
        if to_minutes {
            csv.write_record([
                "constellation",
                "satellites",
                "eez",
                "mean_revisit_min",
                "median_revisit_min",
                "p95_revisit_min",
                "max_revisit_min",
                "gaps",
            ])?;
        } else {
            csv.write_record([
                "constellation",
                "satellites",
                "eez",
                "mean_revisit_s",
                "median_revisit_s",
                "p95_revisit_s",
                "max_revisit_s",
                "gaps",
            ])?;
        }
        for record in self.revisit.iter() {
            csv.write_record(revisit_row(record, to_minutes))?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Formats the cross constellation latency comparison, in minutes.
    pub fn format_latency_comparison<W: Write>(&self, writer: W) -> Result<(), FormattingError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "constellation",
            "ship_id",
            "mode",
            "detect_latency_min",
            "delivery_latency_min",
            "total_latency_min",
        ])?;
        for record in self.latency.iter() {
            csv.write_record([
                record.constellation.clone(),
                record.vessel_id.clone(),
                record.policy.to_string(),
                minutes(record.detect_latency_s()),
                minutes(record.delivery_latency_s()),
                minutes(record.total_latency_s()),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        delivery::{DeliveryOutcome, DeliveryResult, RelayMode},
        detection::{DetectionOutcome, DetectionResult},
        epoch::default_scenario_epoch,
        interval::SatelliteIndex,
        policy::TaskingPolicy,
        revisit::RevisitStats,
        scenario::{LatencyRecord, RevisitRecord, ScenarioReport},
    };

    fn report() -> ScenarioReport {
        let detected = LatencyRecord {
            constellation: "Walker12".to_string(),
            satellite_count: 12,
            vessel_id: "Ship1".to_string(),
            zone_id: "EEZ_West".to_string(),
            policy: TaskingPolicy::Patrol,
            relay: RelayMode::FixedSatellite,
            entry_s: 100.0,
            detection: DetectionOutcome::Detected(DetectionResult {
                vessel_id: "Ship1".to_string(),
                zone_id: "EEZ_West".to_string(),
                entry_s: 100.0,
                detect_s: 160.0,
                detecting_satellite: SatelliteIndex(4),
                latency_s: 60.0,
            }),
            delivery: Some(DeliveryOutcome::Delivered(DeliveryResult {
                detecting_satellite: SatelliteIndex(4),
                downlink_satellite: SatelliteIndex(4),
                detect_s: 160.0,
                downlink_s: 280.0,
                latency_s: 120.0,
            })),
        };

        let mut missed = detected.clone();
        missed.vessel_id = "Ship3".to_string();
        missed.policy = TaskingPolicy::Tracking;
        missed.detection = DetectionOutcome::NotDetected;
        missed.delivery = None;

        ScenarioReport {
            epoch: default_scenario_epoch(),
            latency: vec![detected, missed],
            revisit: vec![
                RevisitRecord {
                    constellation: "Walker12".to_string(),
                    satellite_count: 12,
                    zone_id: "EEZ_West".to_string(),
                    stats: Some(RevisitStats {
                        zone_id: "EEZ_West".to_string(),
                        mean_gap_s: 600.0,
                        median_gap_s: 540.0,
                        p95_gap_s: 1200.0,
                        max_gap_s: 1260.0,
                        gap_count: 12,
                    }),
                },
                RevisitRecord {
                    constellation: "Walker12".to_string(),
                    satellite_count: 12,
                    zone_id: "EEZ_East".to_string(),
                    stats: None,
                },
            ],
        }
    }

    #[test]
    fn latency_table() {
        let mut buf = Vec::<u8>::new();
        report().format_latency(&mut buf).unwrap();
        let content = String::from_utf8(buf).unwrap();
        let lines = content.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("constellation,satellites,ship_id,eez,mode"));
        assert_eq!(
            lines[1],
            "Walker12,12,Ship1,EEZ_West,PATROL,fixed-satellite,100.000,160.000,5,5,280.000,60.000,120.000,180.000,1,1"
        );
        assert_eq!(
            lines[2],
            "Walker12,12,Ship3,EEZ_West,TRACKING,fixed-satellite,100.000,,,,,,,,0,0"
        );
    }

    #[test]
    fn revisit_tables() {
        let mut buf = Vec::<u8>::new();
        report().format_revisit(&mut buf).unwrap();
        let content = String::from_utf8(buf).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], "Walker12,12,EEZ_West,600.000,540.000,1200.000,1260.000,12");
        assert_eq!(lines[2], "Walker12,12,EEZ_East,,,,,");

        let mut buf = Vec::<u8>::new();
        report().format_revisit_comparison(&mut buf).unwrap();
        let content = String::from_utf8(buf).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert!(lines[0].contains("mean_revisit_min"));
        assert_eq!(lines[1], "Walker12,12,EEZ_West,10.000,9.000,20.000,21.000,12");
    }

    #[test]
    fn latency_comparison() {
        let mut buf = Vec::<u8>::new();
        report().format_latency_comparison(&mut buf).unwrap();
        let content = String::from_utf8(buf).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], "Walker12,Ship1,PATROL,1.000,2.000,3.000");
        assert_eq!(lines[2], "Walker12,Ship3,TRACKING,,,");
    }
}
