use super::progress_reporter;
use crate::cli::SubsetArgs;
use crate::config::defaults::DefaultsConfig;
use crate::config::{CommandInputs, build_config};
use crate::error::Result;
use crate::report;
use ffcov::engine::subset::SubsetReport;
use ffcov::workflows;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn run(args: SubsetArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let extra = CommandInputs {
        subset: args.subset.as_deref(),
        ..Default::default()
    };
    let config = build_config(&args.inputs, extra)?;
    let format = args.format.unwrap_or(DefaultsConfig::default().format);

    let reporter = progress_reporter(quiet);
    info!("Invoking the core subset workflow...");
    let classified = workflows::subset::run(&config, &reporter)?;

    if let Some(base) = &args.output_base {
        write_partition_files(base, &classified)?;
    }

    let mut out = report::open_output(args.output.as_deref())?;
    if args.partitions {
        report::write_partition(&mut out, "inset", &classified.in_set)?;
        report::write_partition(&mut out, "outset", &classified.out_set)?;
    } else {
        report::write_subset_counts(&mut out, &classified, format)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the in partition to `<base>.in` and the out partition to `<base>.out`.
fn write_partition_files(base: &Path, classified: &SubsetReport) -> Result<()> {
    for (extension, label, records) in [
        ("in", "inset", &classified.in_set),
        ("out", "outset", &classified.out_set),
    ] {
        let path = base.with_extension(extension);
        info!("Writing {} records to {:?}", records.len(), &path);
        let mut out = report::open_output(Some(&path))?;
        report::write_partition(&mut out, label, records)?;
        out.flush()?;
    }
    Ok(())
}
