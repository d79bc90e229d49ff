use crate::config::SummaryConfig;
use crate::data::{self, EventFile};
use crate::error::SummaryError;
use crate::extractor::AccuracyExtractor;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

pub const HEADER: &str = "Accuracy Summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryStatus {
    Ok,
    Failed,
    Killed,
    NotRun,
}

/// One row of the CSV report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub event_path: String,
    pub run: String,
    pub tool: String,
    pub status: EntryStatus,
    pub exit_code: Option<i32>,
    pub duration_us: u64,
    pub output_bytes: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub entries: usize,
    pub failures: usize,
}

/// Text appended for one event file: path, blank, tool text, two blanks.
///
/// Trailing newlines of the tool text are dropped, so a tool that ends its
/// output with a newline and one that doesn't render the same way.
pub fn render_entry(event_path: &Path, text: &str) -> String {
    format!(
        "{}\n\n{}\n\n\n",
        event_path.display(),
        text.trim_end_matches('\n')
    )
}

/// Writes one entry per event file to `out`, in order.
///
/// A failing extractor only degrades its own entry. Write errors on `out` or
/// on the report abort the loop.
pub fn write_entries<W: Write, R: Write>(
    out: &mut W,
    events: &[EventFile],
    extractor: &dyn AccuracyExtractor,
    mut report: Option<&mut csv::Writer<R>>,
    progress: &ProgressBar,
) -> Result<RunReport, EntryWriteError> {
    let mut summary = RunReport::default();

    for event in events {
        progress.set_message(event.run.clone());

        let start = Instant::now();
        let result = extractor.extract(&event.path);
        let duration_us = start.elapsed().as_micros() as u64;

        let (status, exit_code, text) = match result {
            Ok(output) => {
                let status = match output.exit_code {
                    Some(0) => EntryStatus::Ok,
                    Some(_) => EntryStatus::Failed,
                    None => EntryStatus::Killed,
                };
                (status, output.exit_code, output.stdout)
            }
            Err(err) => {
                warn!(file = %event.path.display(), error = %err, "accuracy tool did not run");
                (EntryStatus::NotRun, None, String::new())
            }
        };

        if matches!(status, EntryStatus::Failed | EntryStatus::Killed) {
            warn!(
                file = %event.path.display(),
                exit_code = ?exit_code,
                "accuracy tool failed, appending its output as-is"
            );
        }

        out.write_all(render_entry(&event.path, &text).as_bytes())
            .map_err(EntryWriteError::Output)?;
        out.flush().map_err(EntryWriteError::Output)?;

        if let Some(writer) = report.as_deref_mut() {
            writer
                .serialize(EntryRecord {
                    event_path: event.path.to_string_lossy().to_string(),
                    run: event.run.clone(),
                    tool: extractor.name().to_string(),
                    status,
                    exit_code,
                    duration_us,
                    output_bytes: text.len(),
                })
                .map_err(EntryWriteError::Report)?;
        }

        summary.entries += 1;
        if status != EntryStatus::Ok {
            summary.failures += 1;
        }
        progress.inc(1);
    }

    Ok(summary)
}

/// Which sink failed inside [`write_entries`].
#[derive(Debug, Error)]
pub enum EntryWriteError {
    #[error("summary write failed: {0}")]
    Output(#[source] io::Error),
    #[error("report write failed: {0}")]
    Report(#[source] csv::Error),
}

/// Runs a whole summary: truncate the output, write the header, then one
/// entry per event file found under the configured input directory.
pub fn summarize(
    config: &SummaryConfig,
    extractor: &dyn AccuracyExtractor,
    progress: &ProgressBar,
) -> Result<RunReport, SummaryError> {
    let output_err = |source: io::Error| SummaryError::Output {
        path: config.output.clone(),
        source,
    };
    let report_err = |path: &Path, source: csv::Error| SummaryError::Report {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(&config.output).map_err(output_err)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{}", HEADER).map_err(output_err)?;
    out.flush().map_err(output_err)?;

    let events = data::discover_event_files(&config.input_dir, &config.prefix);
    info!(
        input = %config.input_dir.display(),
        count = events.len(),
        "discovered event files"
    );

    let mut report = match &config.csv_report {
        Some(path) => Some(
            csv::Writer::from_path(path).map_err(|e| report_err(path.as_path(), e))?,
        ),
        None => None,
    };

    progress.set_length(events.len() as u64);
    let summary = write_entries(&mut out, &events, extractor, report.as_mut(), progress)
        .map_err(|err| match err {
            EntryWriteError::Output(e) => output_err(e),
            EntryWriteError::Report(e) => SummaryError::Report {
                path: config.csv_report.clone().unwrap_or_default(),
                source: e,
            },
        })?;

    if let (Some(writer), Some(path)) = (report.as_mut(), &config.csv_report) {
        writer
            .flush()
            .map_err(|e| report_err(path.as_path(), csv::Error::from(e)))?;
    }

    info!(
        output = %config.output.display(),
        entries = summary.entries,
        failures = summary.failures,
        "summary written"
    );
    Ok(summary)
}
