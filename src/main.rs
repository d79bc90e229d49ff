use acc_summary::config::{Args, SummaryConfig};
use acc_summary::error::SummaryError;
use acc_summary::extractor::CommandExtractor;
use acc_summary::summary;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use indicatif::ProgressBar;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr; stdout is kept for the usage text.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let quiet = args.quiet;
    let config = match SummaryConfig::from_args(args) {
        Ok(config) => config,
        Err(SummaryError::Usage { found }) => {
            println!("{}", Args::command().render_usage());
            info!(found, "wrong number of directories, nothing written");
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(err.into()),
    };

    let extractor =
        CommandExtractor::new(config.tool.clone()).with_args(config.tool_args.iter().cloned());

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };

    let report = summary::summarize(&config, &extractor, &pb)?;
    pb.finish_with_message("Summary complete");

    println!(
        "Summarized {} event files into {}.",
        report.entries,
        config.output.display()
    );
    if let Some(csv) = &config.csv_report {
        println!("Per-entry report saved to {}.", csv.display());
    }

    if config.strict && report.failures > 0 {
        println!("{} extractions failed.", report.failures);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
