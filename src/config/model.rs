// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [build]
/// target = "core-image-minimal"
/// exclude_target = "pseudo-native"
/// clean = true
///
/// [tool]
/// program = "bitbake"
/// build_dir = "build"
/// artifacts = ["*.dot", "pn-buildlist"]
/// ```
///
/// All sections are optional and have defaults matching a stock BitBake
/// setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub tool: ToolSection,
}

/// Validated configuration; obtained through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub build: BuildSection,
    pub tool: ToolSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(build: BuildSection, tool: ToolSection) -> Self {
        Self { build, tool }
    }

    /// The baseline target, if exclusion is enabled.
    pub fn exclude_target(&self) -> Option<&str> {
        self.build.exclude_target()
    }
}

/// `[build]` section: what to rebuild and how.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Target whose recipes get rebuilt.
    #[serde(default = "default_target")]
    pub target: String,

    /// Baseline target whose recipes are treated as already built.
    /// An empty string disables the baseline.
    #[serde(default = "default_exclude_target")]
    pub exclude_target: Option<String>,

    /// Clean each recipe's shared state before rebuilding it.
    #[serde(default = "default_clean")]
    pub clean: bool,

    /// Task the walk starts from (`<target>.<default_task>`).
    #[serde(default = "default_default_task")]
    pub default_task: String,

    /// Task marking a recipe's output as available to dependents; only
    /// recipes with this task in the graph are rebuilt.
    #[serde(default = "default_build_task")]
    pub build_task: String,

    /// Task run by the clean step (`bitbake -c <clean_task> <recipe>`).
    #[serde(default = "default_clean_task")]
    pub clean_task: String,

    /// Environment variable listing recipes provided outside the build.
    #[serde(default = "default_provided_var")]
    pub provided_var: String,
}

impl BuildSection {
    pub fn exclude_target(&self) -> Option<&str> {
        self.exclude_target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn default_target() -> String {
    "core-image-base".to_string()
}

fn default_exclude_target() -> Option<String> {
    Some("pseudo-native".to_string())
}

fn default_clean() -> bool {
    true
}

fn default_default_task() -> String {
    "do_build".to_string()
}

fn default_build_task() -> String {
    "do_populate_sysroot".to_string()
}

fn default_clean_task() -> String {
    "cleansstate".to_string()
}

fn default_provided_var() -> String {
    "ASSUME_PROVIDED".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            target: default_target(),
            exclude_target: default_exclude_target(),
            clean: default_clean(),
            default_task: default_default_task(),
            build_task: default_build_task(),
            clean_task: default_clean_task(),
            provided_var: default_provided_var(),
        }
    }
}

/// `[tool]` section: how the build tool is invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSection {
    /// Build tool executable.
    #[serde(default = "default_program")]
    pub program: String,

    /// Directory the tool runs in; graph files land here.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Name of the task graph written by `<program> -g`.
    #[serde(default = "default_graph_file")]
    pub graph_file: String,

    /// Glob patterns (matched against file names in `build_dir`) removed
    /// after every graph generation.
    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<String>,

    /// Optional executable producing the ordered recipe list from a graph
    /// file instead of walking the graph in-process.
    #[serde(default)]
    pub extractor: Option<PathBuf>,
}

fn default_program() -> String {
    "bitbake".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_graph_file() -> String {
    "task-depends.dot".to_string()
}

fn default_artifacts() -> Vec<String> {
    vec!["*.dot".to_string(), "pn-buildlist".to_string()]
}

impl Default for ToolSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            build_dir: default_build_dir(),
            graph_file: default_graph_file(),
            artifacts: default_artifacts(),
            extractor: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target: Option<String>,
    pub exclude_target: Option<String>,
    pub no_exclude: bool,
    pub no_clean: bool,
}

impl RawConfigFile {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(target) = &overrides.target {
            self.build.target = target.clone();
        }
        if let Some(exclude) = &overrides.exclude_target {
            self.build.exclude_target = Some(exclude.clone());
        }
        if overrides.no_exclude {
            self.build.exclude_target = None;
        }
        if overrides.no_clean {
            self.build.clean = false;
        }
    }
}
