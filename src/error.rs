use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a summary run.
///
/// Extraction failures are not in here: a failing tool only degrades its own
/// entry, see [`crate::extractor::ExtractError`].
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Wrong number of positional arguments
    #[error("expected exactly one directory argument, got {found}")]
    Usage { found: usize },

    /// The working directory was needed to resolve a relative input
    #[error("cannot read the current working directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The summary file could not be created or written
    #[error("cannot write summary file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV report could not be created or written
    #[error("cannot write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
