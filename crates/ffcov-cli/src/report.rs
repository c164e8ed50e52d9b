use crate::cli::ReportFormat;
use ffcov::engine::blame::BlameTable;
use ffcov::engine::coverage::CoverageTable;
use ffcov::engine::moved::Reassignment;
use ffcov::engine::subset::{ClassifiedRecord, SubsetReport};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const PID_WIDTH: usize = 6;
const COUNT_WIDTH: usize = 8;

/// Standard output, or a freshly created file when `path` is given.
pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

pub fn write_coverage(
    out: &mut impl Write,
    table: &CoverageTable,
    format: ReportFormat,
) -> io::Result<()> {
    let ranked = table.ranked();
    match format {
        ReportFormat::Table => {
            writeln!(
                out,
                "{:<PID_WIDTH$} {:>COUNT_WIDTH$} {:>COUNT_WIDTH$} {:>COUNT_WIDTH$} {:>COUNT_WIDTH$}",
                "pid", "env", "rec", "smi", "tor"
            )?;
            for (pid, stats) in ranked {
                writeln!(
                    out,
                    "{:<PID_WIDTH$} {:>COUNT_WIDTH$} {:>COUNT_WIDTH$} {:>COUNT_WIDTH$} {:>COUNT_WIDTH$}",
                    pid,
                    stats.environment_count,
                    stats.record_count(),
                    stats.molecule_count(),
                    stats.target_matches
                )?;
            }
        }
        ReportFormat::Csv => {
            writeln!(
                out,
                "parameter_id,environment_count,distinct_record_count,distinct_molecule_count,target_match_count"
            )?;
            for (pid, stats) in ranked {
                writeln!(
                    out,
                    "{},{},{},{},{}",
                    pid,
                    stats.environment_count,
                    stats.record_count(),
                    stats.molecule_count(),
                    stats.target_matches
                )?;
            }
        }
    }
    Ok(())
}

pub fn write_subset_counts(
    out: &mut impl Write,
    report: &SubsetReport,
    format: ReportFormat,
) -> io::Result<()> {
    match format {
        ReportFormat::Table => {
            writeln!(out, "{:<PID_WIDTH$} {:>COUNT_WIDTH$}", "in", report.in_count())?;
            writeln!(out, "{:<PID_WIDTH$} {:>COUNT_WIDTH$}", "out", report.out_count())?;
        }
        ReportFormat::Csv => {
            writeln!(out, "in_count,out_count")?;
            writeln!(out, "{},{}", report.in_count(), report.out_count())?;
        }
    }
    Ok(())
}

/// Writes one partition as `<label>,<record_id>,<score>` lines. Unscored records get an
/// empty score field.
pub fn write_partition(
    out: &mut impl Write,
    label: &str,
    records: &[ClassifiedRecord],
) -> io::Result<()> {
    for record in records {
        match record.score {
            Some(score) => writeln!(out, "{},{},{}", label, record.record_id, score)?,
            None => writeln!(out, "{},{},", label, record.record_id)?,
        }
    }
    Ok(())
}

pub fn write_blame(out: &mut impl Write, table: &BlameTable) -> io::Result<()> {
    writeln!(out, "param,mean")?;
    for (pid, summary) in table.ranked() {
        if let Some(mean) = summary.mean() {
            writeln!(out, "{},{:.8}", pid, mean)?;
        }
    }
    Ok(())
}

pub fn write_reassignments(out: &mut impl Write, moved: &[Reassignment]) -> io::Result<()> {
    for reassignment in moved {
        writeln!(out, "{}", reassignment)?;
    }
    Ok(())
}
