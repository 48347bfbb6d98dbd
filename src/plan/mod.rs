// src/plan/mod.rs

//! Working out which recipes to rebuild, and in what order.
//!
//! The planner asks the build tool for a task graph, walks it from the
//! target, keeps the recipes that have the build-completion task, and
//! removes those already covered by a baseline target or provided from
//! outside the build.
//!
//! - [`artifacts`] cleans up the graph files after each walk.
//! - [`queue`] holds the resulting lazily-filtered [`BuildQueue`].

pub mod artifacts;
pub mod queue;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use globset::GlobSet;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::dag::{DependencyGraph, NodeId};
use crate::errors::{RebakeError, Result};
use crate::exec::{BuildEnv, BuildTool, RecipeExtractor};
use crate::fs::FileSystem;
use crate::status::StatusReporter;

pub use artifacts::{compile_artifact_patterns, ArtifactGuard};
pub use queue::{target_last, BuildQueue};

/// Planner settings, derived from the validated config.
#[derive(Debug, Clone)]
pub struct PlanSettings {
    pub exclude_target: Option<String>,
    pub default_task: String,
    pub build_task: String,
    pub provided_var: String,
    pub build_dir: PathBuf,
    pub artifacts: GlobSet,
}

impl PlanSettings {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let artifacts = compile_artifact_patterns(&cfg.tool.artifacts)
            .map_err(|e| RebakeError::Config(format!("[tool].artifacts: {e}")))?;
        Ok(Self {
            exclude_target: cfg.exclude_target().map(str::to_string),
            default_task: cfg.build.default_task.clone(),
            build_task: cfg.build.build_task.clone(),
            provided_var: cfg.build.provided_var.clone(),
            build_dir: cfg.tool.build_dir.clone(),
            artifacts,
        })
    }
}

/// Resolves a target into a [`BuildQueue`].
pub struct Planner<'a, T: BuildTool> {
    tool: &'a mut T,
    fs: Arc<dyn FileSystem>,
    settings: &'a PlanSettings,
    extractor: Option<RecipeExtractor>,
    status: &'a mut StatusReporter,
}

impl<'a, T: BuildTool> Planner<'a, T> {
    pub fn new(
        tool: &'a mut T,
        fs: Arc<dyn FileSystem>,
        settings: &'a PlanSettings,
        status: &'a mut StatusReporter,
    ) -> Self {
        Self {
            tool,
            fs,
            settings,
            extractor: None,
            status,
        }
    }

    /// Take recipe lists from an external extractor instead of walking the
    /// graph in-process.
    pub fn with_extractor(mut self, extractor: RecipeExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Build the queue for `target`:
    ///
    /// 1. recipes of the baseline target (if any) are excluded,
    /// 2. so are the names listed in the provided-names variable of the
    ///    global build environment,
    /// 3. the remaining recipes of `target` are queued dependencies first,
    ///    `target` last.
    pub async fn resolve(mut self, target: &str) -> Result<BuildQueue> {
        let mut excluded: HashSet<String> = HashSet::new();

        if let Some(baseline) = self.settings.exclude_target.clone() {
            let recipes = self
                .status
                .track(
                    "Determining recipes to exclude",
                    ordered_recipelist(
                        &mut *self.tool,
                        &self.fs,
                        self.settings,
                        self.extractor.as_ref(),
                        &baseline,
                    ),
                )
                .await?;
            debug!(%baseline, count = recipes.len(), "baseline recipes excluded");
            excluded.extend(recipes);
        }

        let provided_var = &self.settings.provided_var;
        let provided = self
            .status
            .track(
                format!("Extracting {provided_var} from bitbake environment"),
                provided_names(&mut *self.tool, provided_var),
            )
            .await?;
        excluded.extend(provided);

        let order = self
            .status
            .track(
                format!("Determining recipes for {target}"),
                ordered_recipelist(
                    &mut *self.tool,
                    &self.fs,
                    self.settings,
                    self.extractor.as_ref(),
                    target,
                ),
            )
            .await?;

        info!(
            %target,
            recipes = order.len(),
            excluded = excluded.len(),
            "build queue resolved"
        );
        Ok(BuildQueue::new(order, excluded))
    }
}

/// Names listed in `var` of the global build environment.
async fn provided_names<T: BuildTool>(tool: &mut T, var: &str) -> Result<Vec<String>> {
    let dump = tool.environment(None).await?;
    let env = BuildEnv::parse(&dump);
    Ok(env.words(var)?.into_iter().map(str::to_string).collect())
}

/// Recipes needed to build `target`, dependencies first, `target` last.
///
/// Graph artifacts are removed from the build directory before this
/// returns, whatever the outcome.
pub async fn ordered_recipelist<T: BuildTool>(
    tool: &mut T,
    fs: &Arc<dyn FileSystem>,
    settings: &PlanSettings,
    extractor: Option<&RecipeExtractor>,
    target: &str,
) -> Result<Vec<String>> {
    let _artifacts = ArtifactGuard::new(
        Arc::clone(fs),
        settings.build_dir.clone(),
        settings.artifacts.clone(),
    );

    let graph_path = tool.generate_graph(target).await?;
    let start = NodeId::from_parts(target, &settings.default_task);

    let recipes = match extractor {
        Some(extractor) => extractor.extract(&graph_path, &start).await?,
        None => {
            let graph = DependencyGraph::from_file(&**fs, &graph_path)?;
            graph.ensure_acyclic()?;
            recipes_at_stage(&graph, &start, &settings.build_task)
        }
    };

    Ok(target_last(recipes, target))
}

/// Recipes reachable from `start` that have `stage` in the graph, in walk
/// order.
pub fn recipes_at_stage(graph: &DependencyGraph, start: &NodeId, stage: &str) -> Vec<String> {
    graph
        .linearize(start.as_str())
        .filter(|node| node.task == stage)
        .map(|node| node.recipe)
        .collect()
}
