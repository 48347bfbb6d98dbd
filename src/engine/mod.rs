// src/engine/mod.rs

//! Rebuild driver.
//!
//! Takes recipes from a [`crate::plan::BuildQueue`] one at a time and, for
//! each, asks the build tool to clean and then rebuild it. Exactly one tool
//! invocation runs at a time; the first failure or interruption stops the
//! queue.

pub mod driver;

pub use driver::rebuild_recipes;

/// What the driver does per recipe.
#[derive(Debug, Clone)]
pub struct RebuildOptions {
    /// Run `clean_task` before rebuilding.
    pub clean: bool,
    pub clean_task: String,
}

impl RebuildOptions {
    pub fn from_config(cfg: &crate::config::ConfigFile) -> Self {
        Self {
            clean: cfg.build.clean,
            clean_task: cfg.build.clean_task.clone(),
        }
    }
}

/// Recipes the driver got through, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub rebuilt: Vec<String>,
}
