use std::path::PathBuf;

use clap::Parser;
use eezwatch::prelude::{RelayMode, TaskingPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "eezwatch",
    author = "Maritime Access Study contributors",
    version,
    about = "Detection, delivery and revisit latency of maritime surveillance constellations"
)]
pub struct Cli {
    /// Scenario manifest (TOML). Report paths are relative to the manifest.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Output directory for the result tables
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Restrict the run to these constellations (repeatable)
    #[arg(short, long, value_name = "NAME")]
    pub constellation: Vec<String>,

    /// Evaluate these policies instead of the manifest's (repeatable)
    #[arg(short, long, value_name = "POLICY")]
    pub policy: Vec<TaskingPolicy>,

    /// Override the relay mode of every constellation
    #[arg(short, long, value_name = "MODE")]
    pub relay: Option<RelayMode>,

    /// Do not print the summary
    #[arg(short, long)]
    pub quiet: bool,
}
