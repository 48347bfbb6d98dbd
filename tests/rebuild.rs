// tests/rebuild.rs

use std::collections::HashSet;

use rebake::engine::{rebuild_recipes, RebuildOptions};
use rebake::errors::RebakeError;
use rebake::exec::Interruption;
use rebake::fs::mock::MockFileSystem;
use rebake::plan::BuildQueue;
use rebake::status::StatusReporter;
use rebake_test_utils::fake_tool::FakeBuildTool;
use rebake_test_utils::{init_tracing, SharedBuffer};

fn queue(recipes: &[&str]) -> BuildQueue {
    BuildQueue::new(
        recipes.iter().map(|r| r.to_string()).collect(),
        HashSet::new(),
    )
}

fn options(clean: bool) -> RebuildOptions {
    RebuildOptions {
        clean,
        clean_task: "cleansstate".to_string(),
    }
}

fn run(recipe: &str, task: Option<&str>) -> (String, Option<String>) {
    (recipe.to_string(), task.map(str::to_string))
}

#[tokio::test]
async fn each_recipe_is_cleaned_then_rebuilt_in_order() {
    init_tracing();

    let mut tool = FakeBuildTool::new(MockFileSystem::new());
    let out = SharedBuffer::new();
    let mut status = StatusReporter::new(out.clone());

    let summary = rebuild_recipes(
        &mut tool,
        queue(&["zlib", "busybox"]),
        &options(true),
        &mut status,
    )
    .await
    .unwrap();

    assert_eq!(summary.rebuilt, vec!["zlib", "busybox"]);
    assert_eq!(
        tool.task_runs(),
        vec![
            run("zlib", Some("cleansstate")),
            run("zlib", None),
            run("busybox", Some("cleansstate")),
            run("busybox", None),
        ]
    );
    assert_eq!(
        out.lines(),
        vec![
            "Cleaning zlib...done",
            "Rebuilding zlib...done",
            "Cleaning busybox...done",
            "Rebuilding busybox...done",
        ]
    );
}

#[tokio::test]
async fn clean_step_can_be_skipped() {
    init_tracing();

    let mut tool = FakeBuildTool::new(MockFileSystem::new());
    let out = SharedBuffer::new();
    let mut status = StatusReporter::new(out.clone());

    rebuild_recipes(&mut tool, queue(&["zlib"]), &options(false), &mut status)
        .await
        .unwrap();

    assert_eq!(tool.task_runs(), vec![run("zlib", None)]);
    assert_eq!(out.lines(), vec!["Rebuilding zlib...done"]);
}

#[tokio::test]
async fn first_failure_stops_the_queue() {
    init_tracing();

    let mut tool = FakeBuildTool::new(MockFileSystem::new()).failing("zlib");
    let out = SharedBuffer::new();
    let mut status = StatusReporter::new(out.clone());

    let err = rebuild_recipes(
        &mut tool,
        queue(&["quilt-native", "zlib", "busybox"]),
        &options(false),
        &mut status,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RebakeError::ToolFailed { code: Some(1), .. }));
    assert_eq!(
        tool.task_runs(),
        vec![run("quilt-native", None), run("zlib", None)]
    );
    assert_eq!(
        out.lines(),
        vec!["Rebuilding quilt-native...done", "Rebuilding zlib...failed"]
    );
}

#[tokio::test]
async fn interrupt_mid_build_stops_the_queue() {
    init_tracing();

    let mut tool =
        FakeBuildTool::new(MockFileSystem::new()).interrupt_on("zlib", Interruption::Interrupt);
    let out = SharedBuffer::new();
    let mut status = StatusReporter::new(out.clone());

    let err = rebuild_recipes(
        &mut tool,
        queue(&["quilt-native", "zlib", "busybox"]),
        &options(true),
        &mut status,
    )
    .await
    .unwrap_err();

    assert_eq!(err.interruption(), Some(Interruption::Interrupt));
    assert_eq!(Interruption::Interrupt.exit_code(), 130);
    assert!(!tool.task_runs().iter().any(|(recipe, _)| recipe == "busybox"));
    assert_eq!(
        out.lines(),
        vec![
            "Cleaning quilt-native...done",
            "Rebuilding quilt-native...done",
            "Cleaning zlib...done",
            "Rebuilding zlib...interrupted",
        ]
    );
}

#[tokio::test]
async fn terminate_is_reported_as_terminated() {
    init_tracing();

    let mut tool =
        FakeBuildTool::new(MockFileSystem::new()).interrupt_on("busybox", Interruption::Terminate);
    let out = SharedBuffer::new();
    let mut status = StatusReporter::new(out.clone());

    let err = rebuild_recipes(&mut tool, queue(&["busybox"]), &options(false), &mut status)
        .await
        .unwrap_err();

    assert_eq!(err.interruption(), Some(Interruption::Terminate));
    assert_eq!(err.interruption().map(Interruption::exit_code), Some(143));
    assert_eq!(out.lines(), vec!["Rebuilding busybox...terminated"]);
}
