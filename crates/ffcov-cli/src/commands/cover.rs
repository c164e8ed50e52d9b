use super::progress_reporter;
use crate::cli::CoverArgs;
use crate::config::{CommandInputs, build_config};
use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use crate::report;
use ffcov::workflows;
use std::io::Write;
use tracing::info;

pub fn run(args: CoverArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args.inputs, CommandInputs::default())?;
    let format = args.format.unwrap_or(DefaultsConfig::default().format);

    let reporter = progress_reporter(quiet);
    info!("Invoking the core coverage workflow...");
    let coverage = workflows::coverage::run(&config, &reporter)?;

    info!(
        "Workflow finished: {} parameters over {} records.",
        coverage.table.len(),
        coverage.record_count
    );
    let mut out = report::open_output(args.output.as_deref())?;
    report::write_coverage(&mut out, &coverage.table, format)?;
    out.flush()?;
    Ok(())
}
