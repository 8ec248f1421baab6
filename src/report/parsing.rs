//! STK access report parsing
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use hifitime::prelude::Epoch;
use log::{debug, warn};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

use crate::{
    epoch::parse_utcg_seconds,
    errors::ParsingError,
    interval::{AccessInterval, SatelliteIndex, VesselPresence},
};

/// First cell of a block header row
const BLOCK_MARKER: &str = "Access";

/// Second cell of a block header row contains this
const START_TIME_MARKER: &str = "Start Time";

/// First cell of the row closing a block
const STATISTICS_MARKER: &str = "Statistics";

/// [AccessReport] is an access report exported by STK.
/// Reports stack several blocks: one per satellite, or per vessel.
/// Each block opens with a header row (`Access`, `Start Time (UTCG)`, ...)
/// followed by `index, start, stop, duration` rows, and closes on a `Statistics` row.
/// Block `k` is attributed to [SatelliteIndex] `k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessReport {
    blocks: Vec<Vec<AccessInterval>>,
}

fn cell(record: &csv::StringRecord, index: usize) -> Result<&str, ParsingError> {
    record
        .get(index)
        .map(|cell| cell.trim().trim_matches('"').trim())
        .ok_or(ParsingError::MissingColumn)
}

fn parse_access_row(
    record: &csv::StringRecord,
    block: usize,
    epoch: Epoch,
) -> Result<AccessInterval, ParsingError> {
    let start_s = parse_utcg_seconds(cell(record, 1)?, epoch)?;
    let stop_s = parse_utcg_seconds(cell(record, 2)?, epoch)?;

    let duration = cell(record, 3)?;
    let duration_s = duration
        .parse::<f64>()
        .map_err(|_| ParsingError::FloatParsing(duration.to_string()))?;

    let interval =
        AccessInterval::with_declared_duration(SatelliteIndex(block), start_s, stop_s, duration_s)?;
    Ok(interval)
}

impl AccessReport {
    /// Parses an [AccessReport] from any [Read]able input.
    /// Timestamps are expressed in seconds since `epoch`.
    /// Every block is parsed and validated.
    pub fn parse<R: Read>(reader: &mut BufReader<R>, epoch: Epoch) -> Result<Self, ParsingError> {
        Self::parse_blocks(reader, epoch, None)
    }

    /// Parses the first `n_blocks` blocks of an [AccessReport].
    /// Rows of the following blocks are neither parsed nor validated,
    /// a corrupted row past `n_blocks` does not fail the report.
    pub fn parse_first_blocks<R: Read>(
        reader: &mut BufReader<R>,
        epoch: Epoch,
        n_blocks: usize,
    ) -> Result<Self, ParsingError> {
        Self::parse_blocks(reader, epoch, Some(n_blocks))
    }

    fn parse_blocks<R: Read>(
        reader: &mut BufReader<R>,
        epoch: Epoch,
        max_blocks: Option<usize>,
    ) -> Result<Self, ParsingError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut blocks = Vec::<Vec<AccessInterval>>::new();
        let mut skipped = 0;
        let mut in_block = false;

        for record in csv.records() {
            let record = record?;

            let first = match record.get(0) {
                Some(first) => first.trim_matches('"'),
                None => continue,
            };

            if first.is_empty() && record.len() < 2 {
                continue;
            }

            let second = record.get(1).unwrap_or_default();

            if first == BLOCK_MARKER && second.contains(START_TIME_MARKER) {
                match max_blocks {
                    Some(max) if blocks.len() >= max => {
                        skipped += 1;
                        in_block = false;
                    },
                    _ => {
                        blocks.push(Vec::new());
                        in_block = true;
                    },
                }
                continue;
            }

            if first == STATISTICS_MARKER {
                in_block = false;
                continue;
            }

            if in_block {
                let block = blocks.len() - 1;
                let interval = parse_access_row(&record, block, epoch)?;
                blocks[block].push(interval);
            }
        }

        if skipped > 0 {
            warn!("ignoring {} block(s) beyond the first {}", skipped, blocks.len());
        }

        debug!(
            "parsed {} block(s), {} access window(s)",
            blocks.len(),
            blocks.iter().map(|b| b.len()).sum::<usize>()
        );

        Ok(Self { blocks })
    }

    /// Parses an [AccessReport] from a local file.
    /// ```
    /// use eezwatch::prelude::{default_scenario_epoch, AccessReport};
    ///
    /// let report = AccessReport::from_file(
    ///     concat!(env!("CARGO_MANIFEST_DIR"), "/data/STK/Access_EEZ_West_Walker6.csv"),
    ///     default_scenario_epoch(),
    /// ).unwrap();
    ///
    /// assert_eq!(report.num_blocks(), 6);
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P, epoch: Epoch) -> Result<Self, ParsingError> {
        let fd = File::open(path)?;
        let mut reader = BufReader::new(fd);
        Self::parse(&mut reader, epoch)
    }

    /// Parses the first `n_blocks` blocks of a local file, see [Self::parse_first_blocks].
    pub fn from_file_first_blocks<P: AsRef<Path>>(
        path: P,
        epoch: Epoch,
        n_blocks: usize,
    ) -> Result<Self, ParsingError> {
        let fd = File::open(path)?;
        let mut reader = BufReader::new(fd);
        Self::parse_first_blocks(&mut reader, epoch, n_blocks)
    }

    /// Parses an [AccessReport] from a gzip compressed local file.
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P, epoch: Epoch) -> Result<Self, ParsingError> {
        let fd = File::open(path)?;
        let reader = GzDecoder::new(fd);
        let mut reader = BufReader::new(reader);
        Self::parse(&mut reader, epoch)
    }

    /// Parses the first `n_blocks` blocks of a gzip compressed local file.
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file_first_blocks<P: AsRef<Path>>(
        path: P,
        epoch: Epoch,
        n_blocks: usize,
    ) -> Result<Self, ParsingError> {
        let fd = File::open(path)?;
        let reader = GzDecoder::new(fd);
        let mut reader = BufReader::new(reader);
        Self::parse_first_blocks(&mut reader, epoch, n_blocks)
    }

    /// Number of blocks in this report
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the access windows of one block
    pub fn block(&self, block: usize) -> Result<&[AccessInterval], ParsingError> {
        self.blocks
            .get(block)
            .map(|windows| windows.as_slice())
            .ok_or(ParsingError::MissingBlock(block))
    }

    /// Returns the access windows of the first `expected` blocks, block after block.
    /// Blocks beyond are ignored, a report with fewer blocks is tolerated.
    pub fn intervals(&self, expected: usize) -> Vec<AccessInterval> {
        if self.blocks.len() > expected {
            warn!(
                "ignoring {} block(s) beyond the {} expected",
                self.blocks.len() - expected,
                expected
            );
        } else if self.blocks.len() < expected {
            warn!(
                "report only has {} block(s), {} expected",
                self.blocks.len(),
                expected
            );
        }
        self.blocks
            .iter()
            .take(expected)
            .flatten()
            .copied()
            .collect()
    }

    /// Interprets one block of a vessel/zone report as the transits
    /// of that vessel through that zone.
    pub fn vessel_transits(
        &self,
        block: usize,
        vessel_id: &str,
        zone_id: &str,
    ) -> Result<Vec<VesselPresence>, ParsingError> {
        let transits = self
            .block(block)?
            .iter()
            .map(|window| VesselPresence::new(vessel_id, zone_id, window.start_s, window.stop_s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transits)
    }
}
