//! Revisit engine: coverage gaps over a zone of interest
use itertools::Itertools;
use log::{debug, trace};

use crate::{errors::Error, interval::AccessInterval};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [RevisitStats] summarizes the coverage holes of a zone.
/// All statistics are null when coverage is continuous: a null
/// revisit gap is a meaningful measurement.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RevisitStats {
    pub zone_id: String,
    /// Mean gap (s)
    pub mean_gap_s: f64,
    /// Median gap (s), nearest rank
    pub median_gap_s: f64,
    /// 95th percentile gap (s), nearest rank
    pub p95_gap_s: f64,
    /// Largest gap (s)
    pub max_gap_s: f64,
    /// Number of coverage holes
    pub gap_count: usize,
}

impl RevisitStats {
    /// True if the zone is continuously covered
    pub fn is_continuous(&self) -> bool {
        self.gap_count == 0
    }

    /// Returns these [RevisitStats] expressed in minutes,
    /// as (mean, median, p95, max).
    pub fn to_minutes(&self) -> (f64, f64, f64, f64) {
        (
            self.mean_gap_s / 60.0,
            self.median_gap_s / 60.0,
            self.p95_gap_s / 60.0,
            self.max_gap_s / 60.0,
        )
    }
}

/// A block of continuous coverage, once overlapping and abutting
/// access windows have been merged: (start, stop) in seconds.
pub type CoverageBlock = (f64, f64);

/// Merges access windows into continuous coverage blocks, in chronological order.
/// Windows are sorted by start time (stable). A window opening at or before the
/// current coverage frontier extends the current block, any later window opens a new one.
pub fn merged_coverage(windows: &[AccessInterval]) -> Result<Vec<CoverageBlock>, Error> {
    for window in windows.iter() {
        window.validate()?;
    }

    let mut blocks = Vec::<CoverageBlock>::new();

    for window in windows
        .iter()
        .sorted_by(|a, b| a.start_s.total_cmp(&b.start_s))
    {
        match blocks.last_mut() {
            Some((_, frontier)) if window.start_s <= *frontier => {
                *frontier = frontier.max(window.stop_s);
            },
            _ => blocks.push((window.start_s, window.stop_s)),
        }
    }

    Ok(blocks)
}

/// Returns the positive gaps between consecutive coverage blocks,
/// in chronological order.
/// ```
/// use eezwatch::prelude::{coverage_gaps, AccessInterval, SatelliteIndex};
///
/// let windows = [
///     AccessInterval::new(SatelliteIndex(0), 0.0, 10.0).unwrap(),
///     AccessInterval::new(SatelliteIndex(1), 10.0, 20.0).unwrap(),
///     AccessInterval::new(SatelliteIndex(2), 25.0, 30.0).unwrap(),
/// ];
///
/// assert_eq!(coverage_gaps(&windows).unwrap(), vec![5.0]);
/// ```
pub fn coverage_gaps(windows: &[AccessInterval]) -> Result<Vec<f64>, Error> {
    let gaps = merged_coverage(windows)?
        .iter()
        .tuple_windows()
        .map(|((_, frontier), (start, _))| start - frontier)
        .filter(|gap| *gap > 0.0)
        .inspect(|gap| trace!("coverage gap: {}s", gap))
        .collect::<Vec<_>>();
    Ok(gaps)
}

/// Nearest rank percentile of an ascending sorted list:
/// `sorted[round(p / 100 * (n - 1))]`, with ties rounded to even,
/// never interpolated. Returns None on empty list.
/// ```
/// use eezwatch::prelude::percentile;
///
/// let gaps = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile(&gaps, 50.0), Some(3.0));
/// assert_eq!(percentile(&gaps, 95.0), Some(5.0));
/// assert_eq!(percentile(&[], 95.0), None);
/// ```
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let rank = (p / 100.0 * (n - 1) as f64).round_ties_even();
    let index = (rank.max(0.0) as usize).min(n - 1);
    Some(sorted[index])
}

/// Computes the [RevisitStats] of a zone, from all its access windows
/// (all satellites mixed).
///
/// ## Output
/// - None when no access window is provided: there is nothing to measure
/// - [RevisitStats] with null statistics when coverage is continuous
/// - [Error] when a reversed or corrupted window is encountered
pub fn revisit_stats(zone_id: &str, windows: &[AccessInterval]) -> Result<Option<RevisitStats>, Error> {
    if windows.is_empty() {
        debug!("{} - no access windows", zone_id);
        return Ok(None);
    }

    let gaps = coverage_gaps(windows)?
        .into_iter()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect::<Vec<_>>();

    if gaps.is_empty() {
        debug!("{} - continuous coverage", zone_id);
        return Ok(Some(RevisitStats {
            zone_id: zone_id.to_string(),
            ..Default::default()
        }));
    }

    let n = gaps.len();
    let mean_gap_s = gaps.iter().sum::<f64>() / n as f64;

    let stats = RevisitStats {
        zone_id: zone_id.to_string(),
        mean_gap_s,
        median_gap_s: percentile(&gaps, 50.0).unwrap_or_default(),
        p95_gap_s: percentile(&gaps, 95.0).unwrap_or_default(),
        max_gap_s: gaps[n - 1],
        gap_count: n,
    };

    debug!(
        "{} - {} gaps: mean={}s median={}s p95={}s max={}s",
        zone_id, n, stats.mean_gap_s, stats.median_gap_s, stats.p95_gap_s, stats.max_gap_s
    );

    Ok(Some(stats))
}
