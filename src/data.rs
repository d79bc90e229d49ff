use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFile {
    pub path: PathBuf,
    // Name of the subdirectory the file was found in, usually one training run.
    pub run: String,
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Direct children of `dir`, sorted by name, symlinks left unresolved.
fn children(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
}

/// Finds every entry matching `<root>/*/<prefix>*`.
///
/// Only immediate subdirectories are searched, symlinked ones included.
/// Hidden subdirectories are skipped. Results come back sorted by name.
/// A matching entry is kept whatever it is, dangling symlinks included.
/// A missing or unreadable root yields no matches.
pub fn discover_event_files(root: &Path, prefix: &str) -> Vec<EventFile> {
    if !root.is_dir() {
        warn!(root = %root.display(), "input is not a directory, nothing to summarize");
        return Vec::new();
    }

    let mut events = Vec::new();
    for entry in children(root) {
        let subdir = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if is_hidden(subdir.file_name()) {
            continue;
        }

        // Resolved through symlinks, so links to directories count.
        match fs::metadata(subdir.path()) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => continue,
            Err(err) => {
                debug!(path = %subdir.path().display(), error = %err, "not a directory");
                continue;
            }
        }

        let run = subdir.file_name().to_string_lossy().to_string();
        for entry in children(subdir.path()) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(run = %run, error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_name().to_string_lossy().starts_with(prefix) {
                continue;
            }

            debug!(path = %entry.path().display(), run = %run, "found event file");
            events.push(EventFile {
                path: entry.into_path(),
                run: run.clone(),
            });
        }
    }

    events
}
