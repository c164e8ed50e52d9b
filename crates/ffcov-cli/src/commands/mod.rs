pub mod blame;
pub mod cover;
pub mod moved;
pub mod subset;

use crate::utils::progress::CliProgressHandler;
use ffcov::engine::progress::ProgressReporter;

/// A reporter that draws to stderr unless logging is silenced.
fn progress_reporter(quiet: bool) -> ProgressReporter<'static> {
    let handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    ProgressReporter::with_callback(handler.get_callback())
}
