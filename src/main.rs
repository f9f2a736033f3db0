use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod closure;
mod config;
mod document;
mod error;
mod graph;
mod paths;
mod pipeline;
mod prefixes;
mod serialize;
mod tabular;

use cli::{BuildArgs, CheckArgs, Command, RootArgs};
use document::SubstitutionOutcome;
use paths::{display_path, SchemePaths};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    let verbose = matches!(&args.command, Command::Build(build) if build.verbose);
    init_logging(verbose);

    match args.command {
        Command::Build(args) => run_build(args),
        Command::Check(args) => run_check(args),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_build(args: BuildArgs) -> Result<()> {
    let config = config::load_config(&args.config)?;
    let paths = SchemePaths::new(args.root, &config.environment);
    if args.clean {
        pipeline::clean_output(&paths)?;
    }

    let report = pipeline::run_build(&config, &paths)?;
    for extraction in &report.extractions {
        println!(
            "{}/{} ({}, {}): {}",
            extraction.vocabulary,
            extraction.enum_name,
            extraction.format,
            extraction.source_file,
            describe(extraction.substitution, extraction.entries)
        );
    }
    println!(
        "prefixes: {}",
        describe(report.prefixes.substitution, report.prefixes.entries)
    );
    println!("wrote {}", report.output_path);

    if let Some(report_path) = &args.report {
        let text = serde_json::to_string_pretty(&report).context("serialize build report")?;
        std::fs::write(report_path, text.as_bytes())
            .with_context(|| format!("write {}", report_path.display()))?;
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let config = config::load_config(&args.config)?;
    let paths = SchemePaths::new(args.root, &config.environment);
    let inputs = pipeline::check_inputs(&config, &paths)?;
    for input in &inputs {
        println!("ok {}", display_path(input, Some(paths.root())));
    }
    println!(
        "{} vocabulary sources, {} input files",
        config.ontologies.len(),
        inputs.len()
    );
    Ok(())
}

fn describe(outcome: SubstitutionOutcome, entries: usize) -> String {
    match outcome {
        SubstitutionOutcome::Replaced { .. } => format!("{entries} entries"),
        SubstitutionOutcome::NotFound => "sentinel not found, skipped".to_string(),
    }
}
