// src/exec/extract.rs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dag::NodeId;
use crate::errors::Result;
use crate::exec::cancel::CancelToken;
use crate::exec::command::run_supervised;

/// External executable that turns a graph file into an ordered recipe list.
///
/// It is called as `<program> <graph file> <start node>` and must print one
/// recipe per line, dependencies first. Blank lines are ignored.
#[derive(Debug, Clone)]
pub struct RecipeExtractor {
    program: PathBuf,
    cwd: PathBuf,
    cancel: CancelToken,
}

impl RecipeExtractor {
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>, cancel: CancelToken) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.into(),
            cancel,
        }
    }

    pub async fn extract(&self, graph: &Path, start: &NodeId) -> Result<Vec<String>> {
        let args = [graph.as_os_str(), OsStr::new(start.as_str())];
        let out = run_supervised(&self.program, &args[..], &self.cwd, &self.cancel).await?;

        let recipes: Vec<String> = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!(
            program = %self.program.display(),
            %start,
            count = recipes.len(),
            "recipes from external extractor"
        );
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RebakeError;

    #[tokio::test]
    async fn reads_one_recipe_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("extract.sh");
        std::fs::write(&script, "printf 'quilt-native\\n\\n  zlib \\n%s\\n' \"$1\"\n").unwrap();

        // `sh <script> <node>`: the script stands in for the graph argument,
        // so the start node arrives as `$1`.
        let extractor = RecipeExtractor::new("sh", dir.path(), CancelToken::never());
        let recipes = extractor
            .extract(&script, &NodeId::from("busybox.do_build"))
            .await
            .unwrap();

        assert_eq!(recipes, vec!["quilt-native", "zlib", "busybox.do_build"]);
    }

    #[tokio::test]
    async fn failing_extractor_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = RecipeExtractor::new("false", dir.path(), CancelToken::never());
        let err = extractor
            .extract(Path::new("task-depends.dot"), &NodeId::from("busybox.do_build"))
            .await
            .unwrap_err();
        assert!(matches!(err, RebakeError::ToolFailed { .. }));
    }
}
