// src/plan/artifacts.rs

//! Cleanup of the temporary files `bitbake -g` leaves in the build
//! directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Compile file-name patterns such as `*.dot` into one matcher.
pub fn compile_artifact_patterns(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Removes matching files from a directory when dropped.
///
/// Create it before the graph is generated so the files go away whether
/// the generation, the parse, or the walk fails.
#[derive(Debug)]
pub struct ArtifactGuard {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
    patterns: GlobSet,
}

impl ArtifactGuard {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>, patterns: GlobSet) -> Self {
        Self {
            fs,
            dir: dir.into(),
            patterns,
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.patterns.is_match(Path::new(name)))
    }

    /// Remove every matching entry now; returns how many were removed.
    pub fn sweep(&self) -> usize {
        let entries = match self.fs.read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "cannot list build dir for cleanup");
                return 0;
            }
        };

        let mut removed = 0;
        for path in entries.into_iter().filter(|p| self.matches(p)) {
            match self.fs.remove(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed build artifact");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "cannot remove build artifact"),
            }
        }
        removed
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        self.sweep();
    }
}
