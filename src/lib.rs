// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod plan;
pub mod signals;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{load_and_validate, ConfigFile, ConfigOverrides};
use crate::dag::DependencyGraph;
use crate::engine::{rebuild_recipes, RebuildOptions};
use crate::errors::Result;
use crate::exec::{cancel_pair, BitbakeTool, CancelToken, RecipeExtractor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::plan::{BuildQueue, PlanSettings, Planner};
use crate::signals::spawn_signal_listener;
use crate::status::StatusReporter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - signal handling (SIGINT / SIGTERM → cancellation)
/// - planning the build queue
/// - the rebuild driver
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command {
        Command::Deps { dotfile, node } => print_deps(&*fs, &dotfile, &node),
        Command::Recipes(target_args) => {
            let cfg = load_config(&*fs, args.config.as_deref(), &target_args.overrides())?;
            let cancel = install_cancellation()?;
            // Status goes to stderr so stdout is just the recipe list.
            let mut status = StatusReporter::stderr();
            let queue = plan_queue(&cfg, Arc::clone(&fs), cancel, &mut status).await?;
            for recipe in queue {
                println!("{recipe}");
            }
            Ok(())
        }
        Command::Rebuild(rebuild_args) => {
            let cfg = load_config(&*fs, args.config.as_deref(), &rebuild_args.overrides())?;
            let cancel = install_cancellation()?;
            let mut status = StatusReporter::stdout();
            let queue = plan_queue(&cfg, Arc::clone(&fs), cancel.clone(), &mut status).await?;

            let mut tool = BitbakeTool::from_config(&cfg, cancel);
            let options = RebuildOptions::from_config(&cfg);
            let summary = rebuild_recipes(&mut tool, queue, &options, &mut status).await?;
            info!(rebuilt = summary.rebuilt.len(), "rebuild complete");
            Ok(())
        }
    }
}

fn load_config(
    fs: &dyn FileSystem,
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ConfigFile> {
    let cfg = load_and_validate(fs, path, overrides)?;
    debug!(?cfg, "configuration loaded");
    Ok(cfg)
}

fn install_cancellation() -> Result<CancelToken> {
    let (handle, token) = cancel_pair();
    spawn_signal_listener(handle)?;
    Ok(token)
}

/// Resolve the configured target into its build queue.
async fn plan_queue(
    cfg: &ConfigFile,
    fs: Arc<dyn FileSystem>,
    cancel: CancelToken,
    status: &mut StatusReporter,
) -> Result<BuildQueue> {
    let settings = PlanSettings::from_config(cfg)?;
    let mut tool = BitbakeTool::from_config(cfg, cancel.clone());

    let mut planner = Planner::new(&mut tool, fs, &settings, status);
    if let Some(program) = &cfg.tool.extractor {
        planner = planner.with_extractor(RecipeExtractor::new(
            program,
            &cfg.tool.build_dir,
            cancel,
        ));
    }
    planner.resolve(&cfg.build.target).await
}

/// Print every `recipe.task` that `node` depends on, in build order.
fn print_deps(fs: &dyn FileSystem, dotfile: &Path, node: &str) -> Result<()> {
    let graph = DependencyGraph::from_file(fs, dotfile)?;
    graph.ensure_acyclic()?;
    for task in graph.linearize(node) {
        println!("{task}");
    }
    Ok(())
}
