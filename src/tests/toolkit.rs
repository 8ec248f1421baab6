use std::path::PathBuf;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::prelude::{
    default_scenario_epoch, AccessInterval, AccessReport, ConstellationConfig, SatelliteIndex,
    VesselPresence,
};

/// Number of satellites in the test constellation
pub const WALKER6: usize = 6;

/// Path to a fixture report
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("data/STK")
        .join(name)
}

/// Parses a fixture report, at the default scenario epoch
pub fn fixture_report(name: &str) -> AccessReport {
    let path = fixture(name);
    AccessReport::from_file(&path, default_scenario_epoch())
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
}

/// Parses the first `n_blocks` blocks of a fixture report
pub fn fixture_blocks(name: &str, n_blocks: usize) -> Vec<AccessInterval> {
    let path = fixture(name);
    AccessReport::from_file_first_blocks(&path, default_scenario_epoch(), n_blocks)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
        .intervals(n_blocks)
}

/// Builds the 6 satellite test constellation from the fixture reports
pub fn walker6() -> ConstellationConfig {
    let west = fixture_blocks("Access_EEZ_West_Walker6.csv", WALKER6);
    let east = fixture_blocks("Access_EEZ_East_Walker6.csv", WALKER6);
    let ahmedabad = fixture_blocks("Access_GS_Ahmedabad_Walker6.csv", WALKER6);
    let sriharikota = fixture_blocks("Access_GS_Sriharikota_Walker6.csv", WALKER6);

    ConstellationConfig::new("Walker6", WALKER6)
        .unwrap()
        .with_zone_access("EEZ_West", &west)
        .unwrap()
        .with_zone_access("EEZ_East", &east)
        .unwrap()
        .with_ground_access("GS_Ahmedabad", &ahmedabad)
        .unwrap()
        .with_ground_access("GS_Sriharikota", &sriharikota)
        .unwrap()
}

/// Random generator, seeded for reproducibility
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random access window within [0, horizon_s]
pub fn random_window<R: Rng>(rng: &mut R, satellites: usize, horizon_s: f64) -> AccessInterval {
    let start_s = rng.gen_range(0.0..horizon_s).round();
    let duration_s = rng.gen_range(0.0..900.0_f64).round();
    AccessInterval::new(
        SatelliteIndex(rng.gen_range(0..satellites)),
        start_s,
        start_s + duration_s,
    )
    .unwrap()
}

/// Random vessel presence within [0, horizon_s]
pub fn random_presence<R: Rng>(rng: &mut R, horizon_s: f64) -> VesselPresence {
    let start_s = rng.gen_range(0.0..horizon_s).round();
    let duration_s = rng.gen_range(0.0..horizon_s / 4.0).round();
    VesselPresence::new("Ship", "EEZ", start_s, start_s + duration_s).unwrap()
}
