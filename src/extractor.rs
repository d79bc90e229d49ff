use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// What the accuracy tool printed for one event file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    // None when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Produces the accuracy text for a single event file.
pub trait AccuracyExtractor {
    fn name(&self) -> &str;
    fn extract(&self, event_file: &Path) -> Result<ToolOutput, ExtractError>;
}

/// Runs an external program as `<program> [args..] <event_file>` and captures stdout.
///
/// Stderr is inherited so the tool's own diagnostics reach the terminal.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: PathBuf,
    args: Vec<String>,
    name: String,
}

impl CommandExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string_lossy().to_string());
        CommandExtractor {
            program,
            args: Vec::new(),
            name,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl AccuracyExtractor for CommandExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, event_file: &Path) -> Result<ToolOutput, ExtractError> {
        debug!(tool = %self.program.display(), file = %event_file.display(), "running extractor");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(event_file)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ExtractError::Spawn {
                program: self.program.to_string_lossy().to_string(),
                source,
            })?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
