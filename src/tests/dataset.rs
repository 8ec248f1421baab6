use crate::prelude::{
    DeliveryOutcome, RelayMode, SatelliteIndex, Scenario, TaskingPolicy, VesselPresence,
};
use crate::tests::toolkit::{fixture_report, walker6, WALKER6};

fn transits() -> Vec<VesselPresence> {
    let west = fixture_report("Access_Ship1_Ship3_EEZ_West.csv");
    let east = fixture_report("Access_Ship2_EEZ_East.csv");

    let mut transits = west.vessel_transits(0, "Ship1", "EEZ_West").unwrap();
    transits.extend(west.vessel_transits(1, "Ship3", "EEZ_West").unwrap());
    transits.extend(east.vessel_transits(0, "Ship2", "EEZ_East").unwrap());
    transits
}

fn scenario(relay: RelayMode) -> Scenario {
    transits()
        .into_iter()
        .fold(Scenario::default(), |scenario, transit| {
            scenario.with_transit(transit)
        })
        .with_constellation(walker6(), relay)
        .with_known_route("Ship1")
        .with_known_route("Ship2")
}

#[test]
fn fixture_reports() {
    let west = fixture_report("Access_EEZ_West_Walker6.csv");
    assert_eq!(west.num_blocks(), WALKER6);
    assert_eq!(west.intervals(WALKER6).len(), 8);

    // listed out of chronological order
    let sat2 = west.block(1).unwrap();
    assert_eq!(sat2[0].start_s, 14_400.0);
    assert_eq!(sat2[1].start_s, 9_000.0);
    assert_eq!(sat2[1].subject, SatelliteIndex(1));

    let east = fixture_report("Access_EEZ_East_Walker6.csv");
    assert_eq!(east.num_blocks(), WALKER6);
    assert!(east.block(3).unwrap().is_empty());

    let ship1 = fixture_report("Access_Ship1_EEZ_West.csv")
        .vessel_transits(0, "Ship1", "EEZ_West")
        .unwrap();
    assert_eq!(ship1.len(), 1);
    assert_eq!(ship1[0].entry_s(), 7_200.0);
    assert_eq!(ship1[0].exit_s(), 72_000.0);

    let ship3 = &transits()[1];
    assert_eq!(ship3.vessel_id, "Ship3");
    assert_eq!(ship3.entry_s(), 10_800.0);
}

#[test]
fn walker6_constellation() {
    let config = walker6();
    assert_eq!(config.satellite_count(), WALKER6);
    assert_eq!(config.zone_ids().collect::<Vec<_>>(), vec!["EEZ_East", "EEZ_West"]);
    assert_eq!(
        config.ground_station_ids().collect::<Vec<_>>(),
        vec!["GS_Ahmedabad", "GS_Sriharikota"]
    );
    let downlinks = config.downlink_windows();
    assert_eq!(downlinks.len(), 8);
    assert_eq!(downlinks.iter().filter(|w| w.subject == SatelliteIndex(0)).count(), 2);
    assert!(downlinks.iter().all(|w| w.subject != SatelliteIndex(5)));
}

#[test]
fn known_route_vessel() {
    let scenario = scenario(RelayMode::FixedSatellite);

    let patrol = scenario
        .evaluate("Walker6", "Ship1", "EEZ_West", TaskingPolicy::Patrol)
        .unwrap();
    let detection = patrol.detection.result().unwrap();
    assert_eq!(detection.detecting_satellite, SatelliteIndex(0));
    assert_eq!(detection.detect_s, 7_230.0);
    assert_eq!(patrol.detect_latency_s(), Some(30.0));
    assert_eq!(patrol.delivery_latency_s(), Some(570.0));
    assert_eq!(patrol.total_latency_s(), Some(600.0));

    let tracking = scenario
        .evaluate("Walker6", "Ship1", "EEZ_West", TaskingPolicy::Tracking)
        .unwrap();
    assert_eq!(tracking.detect_latency_s(), Some(24.0));
    assert_eq!(tracking.delivery_latency_s(), Some(576.0));
    assert_eq!(tracking.total_latency_s(), Some(600.0));

    let ship2 = scenario
        .evaluate("Walker6", "Ship2", "EEZ_East", TaskingPolicy::Tracking)
        .unwrap();
    let detection = ship2.detection.result().unwrap();
    assert_eq!(detection.detecting_satellite, SatelliteIndex(1));
    assert_eq!(detection.detect_s, 18_024.0);
}

#[test]
fn dark_vessel() {
    let scenario = scenario(RelayMode::FixedSatellite);

    let patrol = scenario
        .evaluate("Walker6", "Ship3", "EEZ_West", TaskingPolicy::Patrol)
        .unwrap();
    let detection = patrol.detection.result().unwrap();
    assert_eq!(detection.detecting_satellite, SatelliteIndex(1));
    assert_eq!(patrol.detect_latency_s(), Some(3_630.0));
    assert_eq!(patrol.delivery_latency_s(), Some(7_170.0));

    // only satellites 1 and 4 are tasked on dark vessels
    let tracking = scenario
        .evaluate("Walker6", "Ship3", "EEZ_West", TaskingPolicy::Tracking)
        .unwrap();
    let detection = tracking.detection.result().unwrap();
    assert_eq!(detection.detecting_satellite, SatelliteIndex(3));
    assert_eq!(detection.detecting_satellite.number(), 4);
    assert_eq!(detection.detect_s, 18_030.0);
    assert_eq!(tracking.detect_latency_s(), Some(7_230.0));
    assert_eq!(tracking.delivery_latency_s(), Some(3_570.0));
}

#[test]
fn baseline_and_relay() {
    let fixed = scenario(RelayMode::FixedSatellite);
    let record = fixed
        .evaluate("Walker6", "Ship1", "EEZ_West", TaskingPolicy::Baseline)
        .unwrap();
    let detection = record.detection.result().unwrap();
    assert_eq!(detection.detecting_satellite, SatelliteIndex(2));
    assert_eq!(record.detect_latency_s(), Some(1_200.0));
    // satellite 3 never sees a ground station after detection
    assert_eq!(record.delivery, Some(DeliveryOutcome::NotDelivered));
    assert!(record.total_latency_s().is_none());

    let relayed = scenario(RelayMode::AnySatellite);
    let record = relayed
        .evaluate("Walker6", "Ship1", "EEZ_West", TaskingPolicy::Baseline)
        .unwrap();
    let delivery = record.delivery.as_ref().and_then(|d| d.result()).unwrap();
    assert_eq!(delivery.detecting_satellite, SatelliteIndex(2));
    assert_eq!(delivery.downlink_satellite, SatelliteIndex(0));
    assert_eq!(delivery.latency_s, 2_400.0);

    // satellite 2 (Ahmedabad) and satellite 4 (Sriharikota) both downlink at 21600s:
    // Ahmedabad windows are listed first
    let record = relayed
        .evaluate("Walker6", "Ship3", "EEZ_West", TaskingPolicy::Patrol)
        .unwrap();
    let delivery = record.delivery.as_ref().and_then(|d| d.result()).unwrap();
    assert_eq!(delivery.downlink_satellite, SatelliteIndex(1));
    assert_eq!(delivery.downlink_s, 21_600.0);
}

#[test]
fn full_scenario() {
    let report = scenario(RelayMode::FixedSatellite).run().unwrap();

    // 3 vessels x 2 policies
    assert_eq!(report.latency.len(), 6);
    assert_eq!(report.detection_rate(TaskingPolicy::Patrol), Some(1.0));
    assert_eq!(report.detection_rate(TaskingPolicy::Tracking), Some(1.0));

    for record in report.policy_latency(TaskingPolicy::Patrol) {
        assert!(record.delivery.as_ref().unwrap().is_delivered());
    }

    assert_eq!(report.revisit.len(), 2);

    let east = report.revisit[0].stats.as_ref().unwrap();
    assert_eq!(east.zone_id, "EEZ_East");
    assert_eq!(east.gap_count, 4);
    assert_eq!(east.mean_gap_s, 5_775.0);
    assert_eq!(east.median_gap_s, 3_000.0);
    assert_eq!(east.p95_gap_s, 17_400.0);
    assert_eq!(east.max_gap_s, 17_400.0);

    let west = report.revisit[1].stats.as_ref().unwrap();
    assert_eq!(west.zone_id, "EEZ_West");
    assert_eq!(west.gap_count, 6);
    assert_eq!(west.mean_gap_s, 11_950.0);
    assert_eq!(west.median_gap_s, 4_800.0);
    assert_eq!(west.p95_gap_s, 31_800.0);
    assert_eq!(west.max_gap_s, 31_800.0);
}

#[test]
fn latency_table() {
    let report = scenario(RelayMode::FixedSatellite).run().unwrap();

    let mut buf = Vec::<u8>::new();
    report.format_latency(&mut buf).unwrap();
    let content = String::from_utf8(buf).unwrap();
    let lines = content.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 7);
    assert_eq!(
        lines[1],
        "Walker6,6,Ship1,EEZ_West,PATROL,fixed-satellite,7200.000,7230.000,1,1,7800.000,30.000,570.000,600.000,1,1"
    );

    let mut buf = Vec::<u8>::new();
    report.format_revisit_comparison(&mut buf).unwrap();
    let content = String::from_utf8(buf).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[1], "Walker6,6,EEZ_East,96.250,50.000,290.000,290.000,4");
}
