use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rebake::errors::RebakeError;
use rebake::exec::{BuildTool, Interruption, ToolFuture};
use rebake::fs::mock::MockFileSystem;

/// One request made to the fake tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GenerateGraph(String),
    Environment(Option<String>),
    RunTask { recipe: String, task: Option<String> },
}

/// A fake build tool that:
/// - records every call
/// - writes canned graphs (plus a `pn-buildlist`) into a `MockFileSystem`
/// - answers environment queries with a canned dump
/// - can fail or be interrupted while building a chosen recipe.
#[derive(Debug, Clone)]
pub struct FakeBuildTool {
    fs: MockFileSystem,
    build_dir: PathBuf,
    graphs: HashMap<String, String>,
    env_dump: String,
    failing: HashSet<String>,
    interrupt_on: Option<(String, Interruption)>,
    calls: Arc<Mutex<Vec<ToolCall>>>,
}

impl FakeBuildTool {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            build_dir: PathBuf::from("."),
            graphs: HashMap::new(),
            env_dump: "ASSUME_PROVIDED=\"\"\n".to_string(),
            failing: HashSet::new(),
            interrupt_on: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    /// Graph written when `generate_graph(target)` is called.
    pub fn graph(mut self, target: &str, dot: impl Into<String>) -> Self {
        self.graphs.insert(target.to_string(), dot.into());
        self
    }

    /// Raw `bitbake -e` style output.
    pub fn env_dump(mut self, dump: impl Into<String>) -> Self {
        self.env_dump = dump.into();
        self
    }

    pub fn assume_provided(self, names: &[&str]) -> Self {
        let dump = format!(
            "# $ASSUME_PROVIDED\nMACHINE=\"qemux86-64\"\nASSUME_PROVIDED=\"{}\"\n",
            names.join(" ")
        );
        self.env_dump(dump)
    }

    /// Any task run for `recipe` fails.
    pub fn failing(mut self, recipe: &str) -> Self {
        self.failing.insert(recipe.to_string());
        self
    }

    /// Building (not cleaning) `recipe` reports `kind`.
    pub fn interrupt_on(mut self, recipe: &str, kind: Interruption) -> Self {
        self.interrupt_on = Some((recipe.to_string(), kind));
        self
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `(recipe, task)` of every `run_task` call, in order.
    pub fn task_runs(&self) -> Vec<(String, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ToolCall::RunTask { recipe, task } => Some((recipe, task)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ToolCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BuildTool for FakeBuildTool {
    fn generate_graph<'a>(&'a mut self, target: &'a str) -> ToolFuture<'a, PathBuf> {
        Box::pin(async move {
            self.record(ToolCall::GenerateGraph(target.to_string()));

            let dot = self.graphs.get(target).ok_or_else(|| RebakeError::ToolFailed {
                command: format!("bitbake -g {target}"),
                code: Some(1),
            })?;

            let path = self.build_dir.join("task-depends.dot");
            self.fs.add_file(&path, dot.as_bytes());
            self.fs
                .add_file(self.build_dir.join("pn-buildlist"), target.as_bytes());
            Ok(path)
        })
    }

    fn environment<'a>(&'a mut self, recipe: Option<&'a str>) -> ToolFuture<'a, String> {
        Box::pin(async move {
            self.record(ToolCall::Environment(recipe.map(str::to_string)));
            Ok(self.env_dump.clone())
        })
    }

    fn run_task<'a>(&'a mut self, recipe: &'a str, task: Option<&'a str>) -> ToolFuture<'a, ()> {
        Box::pin(async move {
            self.record(ToolCall::RunTask {
                recipe: recipe.to_string(),
                task: task.map(str::to_string),
            });

            if let Some((target, kind)) = &self.interrupt_on {
                if target == recipe && task.is_none() {
                    return Err(RebakeError::Interrupted(*kind));
                }
            }
            if self.failing.contains(recipe) {
                return Err(RebakeError::ToolFailed {
                    command: format!("bitbake {recipe}"),
                    code: Some(1),
                });
            }
            Ok(())
        })
    }
}
