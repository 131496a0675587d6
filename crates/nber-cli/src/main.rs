//! # nber-cli
//!
//! Command-line converter from NBER fixed-width data files to CSV.
//!
//! Usage:
//!   nber2csv -i <input.dat>
//!   nber2csv -i <input.dat> -o <output.csv> -m <translations.json>
//!
//! Missing translations are logged as warnings on stderr; any I/O, mapping or
//! location error ends the run with a non-zero exit status.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use nber_mapping::DEFAULT_MAPPING_PATH;
use nber_pipeline::{ConvertConfig, Converter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nber2csv")]
#[command(about = "Provide an NBER fixed-width data file and receive a translated CSV")]
#[command(version)]
struct Cli {
    /// Path to the NBER-formatted input file
    #[arg(short, long)]
    infile: PathBuf,

    /// Path to the CSV output. Overwritten if it exists. Defaults to INFILE with a .csv extension
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Mapping specification (JSON or YAML)
    #[arg(short, long, default_value = DEFAULT_MAPPING_PATH)]
    mapping: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> ConvertConfig {
        let config = ConvertConfig::new(self.infile).mapping(self.mapping);
        match self.outfile {
            Some(outfile) => config.output(outfile),
            None => config,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    tracing::info!("IN: {}", config.input.display());
    tracing::info!("OUT: {}", config.output_path().display());

    let input = config.input.display().to_string();
    let report = Converter::new(config)
        .run()
        .with_context(|| format!("failed to convert {}", input))?;

    tracing::info!(
        "Wrote {} rows to {} ({} missing translations)",
        report.rows,
        report.output.display(),
        report.warnings
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn outfile_defaults_from_infile() {
        let cli = Cli::try_parse_from(["nber2csv", "-i", "data/births.dat"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.output_path(), PathBuf::from("data/births.csv"));
        assert_eq!(config.mapping, PathBuf::from("translations.json"));
    }

    #[test]
    fn long_flags_are_accepted() {
        let cli = Cli::try_parse_from([
            "nber2csv",
            "--infile",
            "births.dat",
            "--outfile",
            "out.csv",
            "--mapping",
            "natality.yaml",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let config = cli.into_config();
        assert_eq!(config.output_path(), PathBuf::from("out.csv"));
        assert_eq!(config.mapping, PathBuf::from("natality.yaml"));
    }

    #[test]
    fn infile_is_required() {
        assert!(Cli::try_parse_from(["nber2csv", "-o", "out.csv"]).is_err());
    }
}
