//! CLI argument parsing for the scheme build.
//!
//! The CLI only locates the config and the build root; every path the build
//! touches comes from the config's `environment` block.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for building controlled-vocabulary schemes.
#[derive(Parser, Debug)]
#[command(
    name = "schema-vocab",
    version,
    about = "Inject ontology and CSV controlled vocabularies into a LinkML scheme",
    after_help = "Examples:\n  schema-vocab check --config config/config.yaml\n  schema-vocab build --config config/config.yaml --clean\n  schema-vocab build --config config/config.yaml --report build-report.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Build(BuildArgs),
    Check(CheckArgs),
}

/// Build command inputs.
#[derive(Parser, Debug)]
#[command(about = "Render every configured vocabulary into the final scheme")]
pub struct BuildArgs {
    /// Vocabulary config YAML (top-level `config:` key)
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Directory the environment paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Remove the final schemes directory before building
    #[arg(long)]
    pub clean: bool,

    /// Write a machine-readable JSON build report
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Log progress for each vocabulary source
    #[arg(long)]
    pub verbose: bool,
}

/// Check command inputs.
#[derive(Parser, Debug)]
#[command(about = "Validate the config and confirm every input file exists")]
pub struct CheckArgs {
    /// Vocabulary config YAML (top-level `config:` key)
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Directory the environment paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}
