//! Scenario epoch and STK UTCG timestamps
use hifitime::prelude::{Duration, Epoch, Unit};
use strum_macros::{EnumIter, EnumString};

use crate::errors::ParsingError;

/// Default scenario start: 2026-01-01T00:00:00 UTC
pub fn default_scenario_epoch() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2026, 1, 1)
}

/// Seconds elapsed from the scenario epoch to `t`.
pub fn seconds_since(scenario_epoch: Epoch, t: Epoch) -> f64 {
    (t - scenario_epoch).to_seconds()
}

/// Absolute [Epoch] of an instant expressed in seconds since the scenario epoch.
/// ```
/// use eezwatch::epoch::{default_scenario_epoch, epoch_at, seconds_since};
///
/// let t0 = default_scenario_epoch();
/// let t = epoch_at(t0, 3600.0);
/// assert_eq!(seconds_since(t0, t), 3600.0);
/// ```
pub fn epoch_at(scenario_epoch: Epoch, seconds: f64) -> Epoch {
    scenario_epoch + seconds * Unit::Second
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
enum Month {
    Jan = 1,
    Feb = 2,
    Mar = 3,
    Apr = 4,
    May = 5,
    Jun = 6,
    Jul = 7,
    Aug = 8,
    Sep = 9,
    Oct = 10,
    Nov = 11,
    Dec = 12,
}

/// Parses an STK UTCG timestamp, for example `1 Jan 2026 08:42:10.037`,
/// into a UTC [Epoch].
pub fn parse_utcg(content: &str) -> Result<Epoch, ParsingError> {
    let content = content.trim().trim_matches('"');
    let err = || ParsingError::TimestampFormat(content.to_string());

    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 4 {
        return Err(err());
    }

    let day = items[0].parse::<u8>().map_err(|_| err())?;

    let month = items[1]
        .parse::<Month>()
        .map_err(|_| ParsingError::MonthName(items[1].to_string()))?;

    let year = items[2].parse::<i32>().map_err(|_| err())?;

    let hms = items[3].split(':').collect::<Vec<_>>();
    if hms.len() != 3 {
        return Err(err());
    }

    let hours = hms[0].parse::<u8>().map_err(|_| err())?;
    let minutes = hms[1].parse::<u8>().map_err(|_| err())?;
    let seconds = hms[2].parse::<f64>().map_err(|_| err())?;

    if hours > 23 || minutes > 59 || !(0.0..60.0).contains(&seconds) {
        return Err(err());
    }

    let midnight = Epoch::maybe_from_gregorian_utc(year, month as u8, day, 0, 0, 0, 0)
        .map_err(|_| err())?;

    let offset = Duration::from_seconds(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds);
    Ok(midnight + offset)
}

/// Parses an STK UTCG timestamp and expresses it in seconds since the scenario epoch.
pub fn parse_utcg_seconds(content: &str, scenario_epoch: Epoch) -> Result<f64, ParsingError> {
    let t = parse_utcg(content)?;
    Ok(seconds_since(scenario_epoch, t))
}
