// Colonist
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Command-line driver for the colonist processor

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colonist_processor::{ColonistParameters, ColonistProcessor};
use tracing::Level;

/// Build-time colony/settler discovery and class patching
#[derive(Parser, Debug)]
#[command(name = "colonist", version, about)]
struct Cli {
    /// Input class container to process; repeatable
    #[arg(long = "input")]
    inputs: Vec<PathBuf>,

    /// Output destination, one per input in order; repeatable
    #[arg(long = "output")]
    outputs: Vec<PathBuf>,

    /// Read-only classpath container for type resolution; repeatable
    #[arg(long = "classpath")]
    classpath: Vec<PathBuf>,

    /// Read-only boot classpath container; repeatable
    #[arg(long = "boot-classpath")]
    boot_classpath: Vec<PathBuf>,

    /// Container widening the settler discovery scope; repeatable
    #[arg(long = "discovery-classpath")]
    discovery_classpath: Vec<PathBuf>,

    /// Destination for generated delegate classes
    #[arg(long = "generation-output")]
    generation_output: Option<PathBuf>,

    /// Run only the colony-patching phase
    #[arg(long)]
    skip_settler_discovery: bool,

    /// JSON parameter bundle replacing the flag form
    #[arg(long, conflicts_with_all = ["inputs", "outputs", "generation_output"])]
    params: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let parameters = load_parameters(cli)?;
    ColonistProcessor::process(&parameters)?;
    Ok(())
}

fn load_parameters(cli: &Cli) -> anyhow::Result<ColonistParameters> {
    if let Some(path) = &cli.params {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading parameter bundle {}", path.display()))?;
        let parameters =
            serde_json::from_str(&text).with_context(|| format!("parsing parameter bundle {}", path.display()))?;
        return Ok(parameters);
    }
    Ok(ColonistParameters {
        inputs: cli.inputs.clone(),
        outputs: cli.outputs.clone(),
        classpath: cli.classpath.clone(),
        boot_classpath: cli.boot_classpath.clone(),
        discovery_classpath: cli.discovery_classpath.clone(),
        generation_output: cli.generation_output.clone().unwrap_or_default(),
        discover_settlers: !cli.skip_settler_discovery,
    })
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}
