// src/exec/backend.rs

//! Pluggable build-tool abstraction.
//!
//! The planner and the rebuild driver talk to a `BuildTool` instead of
//! spawning `bitbake` themselves. This makes it easy to swap in a fake tool
//! in tests while keeping the production implementation in
//! [`BitbakeTool`].

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::exec::cancel::CancelToken;
use crate::exec::command::run_supervised;

/// Boxed future returned by [`BuildTool`] operations.
pub type ToolFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The operations `rebake` needs from the build tool.
///
/// Production code uses [`BitbakeTool`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait BuildTool: Send {
    /// Write the task dependency graph for `target` and return the path of
    /// the graph file.
    fn generate_graph<'a>(&'a mut self, target: &'a str) -> ToolFuture<'a, PathBuf>;

    /// Dump the build environment, globally or for one recipe. Returns the
    /// raw `VAR="value"` text; see [`crate::exec::BuildEnv`].
    fn environment<'a>(&'a mut self, recipe: Option<&'a str>) -> ToolFuture<'a, String>;

    /// Run `task` for `recipe`, or the recipe's default (build) task when
    /// `task` is `None`.
    fn run_task<'a>(&'a mut self, recipe: &'a str, task: Option<&'a str>) -> ToolFuture<'a, ()>;
}

/// `bitbake` run as a supervised child process from the build directory.
#[derive(Debug, Clone)]
pub struct BitbakeTool {
    program: String,
    build_dir: PathBuf,
    graph_file: String,
    cancel: CancelToken,
}

impl BitbakeTool {
    pub fn new(
        program: impl Into<String>,
        build_dir: impl Into<PathBuf>,
        graph_file: impl Into<String>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            program: program.into(),
            build_dir: build_dir.into(),
            graph_file: graph_file.into(),
            cancel,
        }
    }

    pub fn from_config(cfg: &ConfigFile, cancel: CancelToken) -> Self {
        Self::new(
            cfg.tool.program.clone(),
            cfg.tool.build_dir.clone(),
            cfg.tool.graph_file.clone(),
            cancel,
        )
    }

    async fn invoke(&self, args: Vec<&str>) -> Result<String> {
        run_supervised(&self.program, args.as_slice(), &self.build_dir, &self.cancel).await
    }
}

impl BuildTool for BitbakeTool {
    fn generate_graph<'a>(&'a mut self, target: &'a str) -> ToolFuture<'a, PathBuf> {
        Box::pin(async move {
            self.invoke(vec!["-g", target]).await?;
            let path = self.build_dir.join(&self.graph_file);
            debug!(%target, graph = %path.display(), "dependency graph written");
            Ok(path)
        })
    }

    fn environment<'a>(&'a mut self, recipe: Option<&'a str>) -> ToolFuture<'a, String> {
        Box::pin(async move {
            let mut args = vec!["-e"];
            args.extend(recipe);
            self.invoke(args).await
        })
    }

    fn run_task<'a>(&'a mut self, recipe: &'a str, task: Option<&'a str>) -> ToolFuture<'a, ()> {
        Box::pin(async move {
            let mut args = Vec::with_capacity(3);
            if let Some(task) = task {
                args.extend(["-c", task]);
            }
            args.push(recipe);
            self.invoke(args).await?;
            Ok(())
        })
    }
}
