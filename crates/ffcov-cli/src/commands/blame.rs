use super::progress_reporter;
use crate::cli::BlameArgs;
use crate::config::{CommandInputs, build_config};
use crate::error::Result;
use crate::report;
use ffcov::workflows;
use std::io::Write;
use tracing::info;

pub fn run(args: BlameArgs, quiet: bool) -> Result<()> {
    let config = build_config(&args.inputs, CommandInputs::default())?;

    let reporter = progress_reporter(quiet);
    info!("Invoking the core blame workflow...");
    let table = workflows::blame::run(&config, &reporter)?;

    let mut out = report::open_output(args.output.as_deref())?;
    report::write_blame(&mut out, &table)?;
    out.flush()?;
    Ok(())
}
