//! Console summary
use itertools::Itertools;

use eezwatch::prelude::{LatencyRecord, ScenarioReport};

fn minutes(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:>8.1}", value / 60.0),
        None => format!("{:>8}", "-"),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (count, sum) = values.fold((0, 0.0), |(count, sum), v| (count + 1, sum + v));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn latency_line(records: &[&LatencyRecord]) -> String {
    let detected = records.iter().filter(|r| r.detected()).count();
    format!(
        "{}/{} detected | detect {} | delivery {} | total {} (mean, min)",
        detected,
        records.len(),
        minutes(mean(records.iter().filter_map(|r| r.detect_latency_s()))),
        minutes(mean(records.iter().filter_map(|r| r.delivery_latency_s()))),
        minutes(mean(records.iter().filter_map(|r| r.total_latency_s()))),
    )
}

/// Prints one latency line per (constellation, policy)
/// and one revisit line per (constellation, zone).
pub fn print(report: &ScenarioReport) {
    println!("Scenario epoch: {}", report.epoch);

    let groups = report
        .latency
        .iter()
        .into_group_map_by(|r| (r.constellation.clone(), r.policy));

    for ((constellation, policy), records) in groups.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        println!("{:<12} {:<9} {}", constellation, policy, latency_line(&records));
    }

    for record in report.revisit.iter() {
        match &record.stats {
            Some(stats) => {
                let (mean, median, p95, max) = stats.to_minutes();
                println!(
                    "{:<12} {:<9} revisit mean {:.1} median {:.1} p95 {:.1} max {:.1} (min, {} gaps)",
                    record.constellation, record.zone_id, mean, median, p95, max, stats.gap_count
                );
            },
            None => println!(
                "{:<12} {:<9} revisit: no access",
                record.constellation, record.zone_id
            ),
        }
    }
}
