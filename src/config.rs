use crate::error::SummaryError;
use clap::Parser;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "acc_summary.txt";
pub const DEFAULT_TOOL: &str = "get_accuracy";
pub const DEFAULT_PREFIX: &str = "event";

/// Summarize accuracy for every event file one level below DIRECTORY.
#[derive(Parser, Debug)]
#[command(name = "acc_summary", version, about)]
pub struct Args {
    /// Folder whose immediate subdirectories hold the event files
    #[arg(value_name = "DIRECTORY")]
    pub inputs: Vec<PathBuf>,

    /// Summary file, truncated on every run
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Accuracy extraction executable, looked up on PATH
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: PathBuf,

    /// Extra argument passed to the tool before the event path (repeatable)
    #[arg(long = "tool-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// File name prefix that marks an event file
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Also write a per-entry CSV report to this path
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Exit non-zero when any extraction fails
    #[arg(long)]
    pub strict: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub tool: PathBuf,
    pub tool_args: Vec<String>,
    pub prefix: String,
    pub csv_report: Option<PathBuf>,
    pub strict: bool,
}

impl SummaryConfig {
    /// Config with default output, tool and prefix for an already resolved directory.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        SummaryConfig {
            input_dir: input_dir.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            tool: PathBuf::from(DEFAULT_TOOL),
            tool_args: Vec::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            csv_report: None,
            strict: false,
        }
    }

    pub fn from_args(args: Args) -> Result<Self, SummaryError> {
        if args.inputs.len() != 1 {
            return Err(SummaryError::Usage {
                found: args.inputs.len(),
            });
        }
        let input_dir = resolve_input(&args.inputs[0])?;

        Ok(SummaryConfig {
            input_dir,
            output: args.output,
            tool: args.tool,
            tool_args: args.tool_args,
            prefix: args.prefix,
            csv_report: args.csv,
            strict: args.strict,
        })
    }
}

/// Absolute, symlink-free form of `path`, which need not exist.
///
/// Each prefix is canonicalized while it exists. Past the first missing
/// component the rest is joined lexically, with `..` popping a component.
pub fn resolve_input(path: &Path) -> Result<PathBuf, SummaryError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(SummaryError::CurrentDir)?
            .join(path)
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if let Ok(canonical) = fs::canonicalize(&resolved) {
                    resolved = canonical;
                }
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("argv should parse")
    }

    #[test]
    fn test_no_directory_is_usage_error() {
        let err = SummaryConfig::from_args(parse(&["acc_summary"])).unwrap_err();
        assert!(matches!(err, SummaryError::Usage { found: 0 }));
    }

    #[test]
    fn test_two_directories_is_usage_error() {
        let err = SummaryConfig::from_args(parse(&["acc_summary", "a", "b"])).unwrap_err();
        assert!(matches!(err, SummaryError::Usage { found: 2 }));
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            SummaryConfig::from_args(parse(&["acc_summary", dir.path().to_str().unwrap()]))
                .unwrap();

        assert_eq!(config.input_dir, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(config.output, PathBuf::from("acc_summary.txt"));
        assert_eq!(config.tool, PathBuf::from("get_accuracy"));
        assert_eq!(config.prefix, "event");
        assert!(config.tool_args.is_empty());
        assert!(config.csv_report.is_none());
        assert!(!config.strict);
    }

    #[test]
    fn test_tool_args_accept_leading_dash() {
        let args = parse(&[
            "acc_summary",
            "--tool",
            "sh",
            "--tool-arg",
            "-c",
            "--tool-arg",
            "echo $1",
            "runs",
        ]);
        assert_eq!(args.tool_args, vec!["-c".to_string(), "echo $1".to_string()]);
        assert_eq!(args.inputs, vec![PathBuf::from("runs")]);
    }

    #[test]
    fn test_resolve_relative_is_absolute() {
        let resolved = resolve_input(Path::new("some/relative/dir")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative/dir"));
    }

    #[test]
    fn test_resolve_missing_tail_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not_there").join(".").join("deeper");
        let resolved = resolve_input(&missing).unwrap();
        assert_eq!(
            resolved,
            fs::canonicalize(dir.path())
                .unwrap()
                .join("not_there")
                .join("deeper")
        );
    }

    #[test]
    fn test_resolve_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        let resolved = resolve_input(&dir.path().join("a").join("..").join("b")).unwrap();
        assert_eq!(resolved, fs::canonicalize(dir.path().join("b")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("run1");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("latest");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let resolved = resolve_input(&link).unwrap();
        assert_eq!(resolved, fs::canonicalize(&target).unwrap());
    }
}
