// src/engine/driver.rs

use tracing::{info, warn};

use crate::engine::{RebuildOptions, RebuildSummary};
use crate::errors::Result;
use crate::exec::BuildTool;
use crate::status::StatusReporter;

/// Clean (optionally) and rebuild each recipe from `queue`, in order.
///
/// Recipes are pulled from `queue` only as they are reached, so nothing
/// past a failing recipe is looked at. Errors, including interruptions,
/// are returned unchanged after the status line records them.
pub async fn rebuild_recipes<T, I>(
    tool: &mut T,
    queue: I,
    options: &RebuildOptions,
    status: &mut StatusReporter,
) -> Result<RebuildSummary>
where
    T: BuildTool,
    I: IntoIterator<Item = String>,
{
    let mut summary = RebuildSummary::default();

    for recipe in queue {
        if options.clean {
            status
                .track(
                    format!("Cleaning {recipe}"),
                    tool.run_task(&recipe, Some(options.clean_task.as_str())),
                )
                .await
                .inspect_err(|e| warn!(%recipe, error = %e, "clean failed"))?;
        }

        status
            .track(format!("Rebuilding {recipe}"), tool.run_task(&recipe, None))
            .await
            .inspect_err(|e| warn!(%recipe, error = %e, "rebuild failed"))?;

        info!(%recipe, "recipe rebuilt");
        summary.rebuilt.push(recipe);
    }

    Ok(summary)
}
