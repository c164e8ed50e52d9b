use super::progress_reporter;
use crate::cli::MovedArgs;
use crate::config::{CommandInputs, build_config};
use crate::error::Result;
use crate::report;
use ffcov::workflows;
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: MovedArgs, quiet: bool) -> Result<()> {
    let extra = CommandInputs {
        compare_labels: args.compare_labels.as_deref(),
        compare_forcefield: args.compare_forcefield.as_deref(),
        ..Default::default()
    };
    let config = build_config(&args.inputs, extra)?;

    let reporter = progress_reporter(quiet);
    info!("Invoking the core reassignment workflow...");
    let moved = workflows::moved::run(&config, &reporter)?;
    if moved.is_empty() {
        warn!("No torsion changes parameter between the two force fields.");
    }

    let mut out = report::open_output(args.output.as_deref())?;
    report::write_reassignments(&mut out, &moved)?;
    out.flush()?;
    Ok(())
}
