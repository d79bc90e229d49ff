use acc_summary::report;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Print per-status counts for a report written by `acc_summary --csv`.
#[derive(Parser, Debug)]
#[command(name = "acc_report", version, about)]
struct Args {
    /// CSV report to read
    csv: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Reading {}...", args.csv.display());
    let tally = report::tally(&args.csv)?;
    println!("{}", tally);

    Ok(())
}
