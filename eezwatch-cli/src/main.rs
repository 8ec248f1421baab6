mod cli;
mod manifest;
mod summary;

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{error, info};
use thiserror::Error;

use eezwatch::prelude::{ConfigurationError, FormattingError, ParsingError, ScenarioReport};

use cli::Cli;
use manifest::Manifest;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] toml::de::Error),
    #[error("invalid epoch \"{0}\": {1}")]
    Epoch(String, String),
    #[error("invalid relay mode \"{0}\"")]
    RelayMode(String),
    #[error("constellation \"{0}\" is not described in the manifest")]
    UnknownConstellation(String),
    #[error("{}: {source}", path.display())]
    Report { path: PathBuf, source: ParsingError },
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("formatting error: {0}")]
    Formatting(#[from] FormattingError),
}

fn write_table<F>(path: &Path, format: F) -> Result<(), Error>
where
    F: FnOnce(BufWriter<File>) -> Result<(), FormattingError>,
{
    let fd = File::create(path)?;
    format(BufWriter::new(fd))?;
    info!("generated {}", path.display());
    Ok(())
}

fn write_tables(report: &ScenarioReport, output: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(output)?;
    write_table(&output.join("latency.csv"), |w| report.format_latency(w))?;
    write_table(&output.join("revisit.csv"), |w| report.format_revisit(w))?;
    write_table(&output.join("comparison_latency.csv"), |w| {
        report.format_latency_comparison(w)
    })?;
    write_table(&output.join("comparison_revisit.csv"), |w| {
        report.format_revisit_comparison(w)
    })?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    let manifest = Manifest::from_file(&cli.manifest)?;

    let mut scenario = manifest.scenario(&cli.constellation)?;

    if !cli.policy.is_empty() {
        scenario = scenario.with_policies(&cli.policy);
    }

    if let Some(relay) = cli.relay {
        let configs = scenario
            .constellations()
            .map(|run| run.config.clone())
            .collect::<Vec<_>>();
        for config in configs {
            scenario = scenario.with_constellation(config, relay);
        }
    }

    let report = scenario.run()?;

    write_tables(&report, &cli.output)?;

    if !cli.quiet {
        summary::print(&report);
    }

    Ok(())
}

pub fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use eezwatch::prelude::{RelayMode, TaskingPolicy};

    fn walker6_manifest() -> PathBuf {
        PathBuf::new()
            .join(env!("CARGO_MANIFEST_DIR"))
            .join("../data/walker6.toml")
    }

    #[test]
    fn error_messages() {
        let e = Error::Report {
            path: PathBuf::from("STK/Access_EEZ_West_Walker6.csv"),
            source: ParsingError::MissingColumn,
        };
        assert_eq!(
            e.to_string(),
            "STK/Access_EEZ_West_Walker6.csv: missing column in access row"
        );

        let e: Error = ConfigurationError::UnknownPolicy("SWEEP".to_string()).into();
        assert!(matches!(e, Error::Configuration(_)));
        assert_eq!(
            e.to_string(),
            "configuration error: unknown tasking policy \"SWEEP\""
        );
    }

    #[test]
    fn walker6_scenario() {
        let manifest = Manifest::from_file(&walker6_manifest()).unwrap();
        assert_eq!(
            manifest.policies().unwrap(),
            vec![TaskingPolicy::Patrol, TaskingPolicy::Tracking]
        );

        let scenario = manifest.scenario(&[]).unwrap();
        let run = scenario.constellation("Walker6").unwrap();
        assert_eq!(run.relay, RelayMode::FixedSatellite);
        assert!(scenario.on_known_route("Ship1"));
        assert!(!scenario.on_known_route("Ship3"));

        let report = scenario.run().unwrap();
        assert_eq!(report.latency.len(), 6);
        assert_eq!(report.latency[0].total_latency_s(), Some(600.0));
        assert_eq!(report.revisit.len(), 2);
    }

    #[test]
    fn unknown_constellation() {
        let manifest = Manifest::from_file(&walker6_manifest()).unwrap();
        assert!(matches!(
            manifest.scenario(&["Walker32".to_string()]),
            Err(Error::UnknownConstellation(_))
        ));
    }

    #[test]
    fn missing_report() {
        let manifest: Manifest = toml::from_str(
            r#"
[[constellation]]
name = "Walker6"
satellites = 6

[constellation.zones]
EEZ_West = "missing.csv"
"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.scenario(&[]),
            Err(Error::Report { .. })
        ));
    }
}
