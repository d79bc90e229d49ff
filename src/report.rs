use crate::summary::{EntryRecord, EntryStatus};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Aggregate view of a CSV report written with `--csv`.
#[derive(Debug, Default, PartialEq)]
pub struct Tally {
    pub by_status: BTreeMap<EntryStatus, usize>,
    pub total: usize,
    // Mean tool time over `Ok` entries, in milliseconds.
    pub mean_ok_ms: Option<f64>,
}

pub fn tally(csv_path: &Path) -> Result<Tally> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("cannot open report {}", csv_path.display()))?;

    let mut tally = Tally::default();
    let mut ok_durations: Vec<u64> = Vec::new();

    for result in rdr.deserialize() {
        let record: EntryRecord = result
            .with_context(|| format!("malformed row in {}", csv_path.display()))?;

        tally.total += 1;
        *tally.by_status.entry(record.status).or_insert(0) += 1;
        if record.status == EntryStatus::Ok {
            ok_durations.push(record.duration_us);
        }
    }

    if !ok_durations.is_empty() {
        let sum: u64 = ok_durations.iter().sum();
        tally.mean_ok_ms = Some(sum as f64 / ok_durations.len() as f64 / 1000.0);
    }

    Ok(tally)
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (status, count) in &self.by_status {
            writeln!(f, "{:<8} {}", format!("{:?}", status), count)?;
        }
        writeln!(f, "{:<8} {}", "Total", self.total)?;
        match self.mean_ok_ms {
            Some(ms) => write!(f, "Mean tool time (ok entries): {:.2} ms", ms),
            None => write!(f, "Mean tool time (ok entries): n/a"),
        }
    }
}
