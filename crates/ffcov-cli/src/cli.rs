use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ffcov - Measure how the torsion parameters of a force field cover a set of quantum-chemistry records.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process records.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report environment, record, molecule and target-match counts per torsion parameter.
    Cover(CoverArgs),
    /// Split scored records by whether their molecule uses a parameter from a subset.
    Subset(SubsetArgs),
    /// Report the mean record score of every torsion parameter.
    Blame(BlameArgs),
    /// List torsions whose parameter changes between two force fields.
    Moved(MovedArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Fixed-width columns for reading in a terminal
    Table,
    /// Comma-separated values with a header line
    Csv,
}

/// Inputs shared by every analysis.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dataset in the QCSubmit result-collection JSON layout.
    #[arg(short, long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Score table (CSV with a header and `record_id,score` rows).
    /// Restricts the analysis to the scored records.
    #[arg(short = 'r', long, value_name = "PATH")]
    pub scores: Option<PathBuf>,

    /// Label library (JSON) holding the torsion labels of every dataset molecule.
    #[arg(short, long, value_name = "PATH")]
    pub labels: Option<PathBuf>,

    /// Force field the label library must have been generated with.
    #[arg(short, long, value_name = "NAME")]
    pub forcefield: Option<String>,

    /// Label every record directly instead of caching tables per molecule.
    #[arg(long)]
    pub no_cache: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S labels.forcefield=openff-2.2.0.offxml
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `cover` subcommand.
#[derive(Args, Debug)]
pub struct CoverArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Output layout of the coverage report.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `subset` subcommand.
#[derive(Args, Debug)]
pub struct SubsetArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Whitespace-separated list of parameter IDs.
    #[arg(short, long, value_name = "PATH")]
    pub subset: Option<PathBuf>,

    /// Output layout of the partition counts.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Print every classified record as `inset,<id>,<score>` or `outset,<id>,<score>`
    /// instead of the counts.
    #[arg(long, conflicts_with = "output_base")]
    pub partitions: bool,

    /// Write the two partitions to `<BASE>.in` and `<BASE>.out`.
    #[arg(long, value_name = "BASE")]
    pub output_base: Option<PathBuf>,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `blame` subcommand.
#[derive(Args, Debug)]
pub struct BlameArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `moved` subcommand.
#[derive(Args, Debug)]
pub struct MovedArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Label library of the force field to compare against.
    #[arg(long, value_name = "PATH")]
    pub compare_labels: Option<PathBuf>,

    /// Force field the comparison label library was generated with.
    #[arg(long, value_name = "NAME")]
    pub compare_forcefield: Option<String>,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "ffcov", "cover", "-d", "td.json", "-l", "labels.json", "-vv", "-j", "4",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        match cli.command {
            Commands::Cover(args) => {
                assert_eq!(args.inputs.dataset, Some(PathBuf::from("td.json")));
                assert_eq!(args.inputs.labels, Some(PathBuf::from("labels.json")));
                assert!(args.format.is_none());
            }
            other => panic!("expected cover, got {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["ffcov", "-q", "-v", "cover"]);
        assert!(result.is_err());
    }

    #[test]
    fn subset_partitions_conflict_with_output_base() {
        let result = Cli::try_parse_from([
            "ffcov",
            "subset",
            "--partitions",
            "--output-base",
            "split",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn set_values_accumulate() {
        let cli = Cli::parse_from([
            "ffcov",
            "blame",
            "-S",
            "inputs.scores=dde.csv",
            "-S",
            "labels.cache=false",
        ]);
        let Commands::Blame(args) = cli.command else {
            panic!("expected blame");
        };
        assert_eq!(
            args.inputs.set_values,
            vec!["inputs.scores=dde.csv", "labels.cache=false"]
        );
    }

    #[test]
    fn format_accepts_csv() {
        let cli = Cli::parse_from(["ffcov", "cover", "--format", "csv"]);
        let Commands::Cover(args) = cli.command else {
            panic!("expected cover");
        };
        assert_eq!(args.format, Some(ReportFormat::Csv));
    }
}
