// tests/graph_files.rs

use std::path::PathBuf;

use rebake::dag::{DependencyGraph, NodeId};
use rebake::errors::RebakeError;
use rebake::fs::RealFileSystem;
use rebake::plan::recipes_at_stage;
use rebake_test_utils::init_tracing;

/// Trimmed `task-depends.dot` in the layout `bitbake -g` writes.
const TASK_DEPENDS: &str = r#"digraph depends {
"busybox.do_build" [label="busybox do_build\n:1.36.1-r0\n/poky/meta/recipes-core/busybox/busybox_1.36.1.bb"]
"busybox.do_build" -> "busybox.do_populate_sysroot"
"busybox.do_build" -> "busybox.do_package_write_rpm" [style=dashed]
"busybox.do_populate_sysroot" [label="busybox do_populate_sysroot\n:1.36.1-r0\n/poky/meta/recipes-core/busybox/busybox_1.36.1.bb"]
"busybox.do_populate_sysroot" -> "zlib.do_populate_sysroot"
"busybox.do_populate_sysroot" -> "busybox.do_install"
"busybox.do_install" -> "quilt-native.do_populate_sysroot"
"zlib.do_populate_sysroot" [label="zlib do_populate_sysroot\n:1.3-r0\n/poky/meta/recipes-core/zlib/zlib_1.3.bb"]
"zlib.do_populate_sysroot" -> "quilt-native.do_populate_sysroot"
"quilt-native.do_populate_sysroot" [label="quilt-native do_populate_sysroot\n:0.67-r0\n/poky/meta/recipes-devtools/quilt/quilt-native_0.67.bb"]
}
"#;

fn write_graph(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("task-depends.dot");
    std::fs::write(&path, TASK_DEPENDS).unwrap();
    path
}

#[test]
fn parses_bitbake_output_from_disk() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = write_graph(&dir);

    let graph = DependencyGraph::from_file(&RealFileSystem, &path).unwrap();

    assert_eq!(graph.edge_count(), 6);
    assert_eq!(graph.dependencies_of("busybox.do_build").len(), 2);
    assert!(graph.dependencies_of("quilt-native.do_populate_sysroot").is_empty());
    graph.ensure_acyclic().unwrap();
}

#[test]
fn walk_lists_every_task_once_dependencies_first() {
    let dir = tempfile::tempdir().unwrap();
    let graph = DependencyGraph::from_file(&RealFileSystem, &write_graph(&dir)).unwrap();

    let tasks: Vec<String> = graph
        .linearize("busybox.do_build")
        .map(|task| task.to_string())
        .collect();

    assert_eq!(
        tasks,
        vec![
            "busybox.do_package_write_rpm",
            "quilt-native.do_populate_sysroot",
            "busybox.do_install",
            "zlib.do_populate_sysroot",
            "busybox.do_populate_sysroot",
        ]
    );
}

#[test]
fn only_recipes_with_the_build_task_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let graph = DependencyGraph::from_file(&RealFileSystem, &write_graph(&dir)).unwrap();

    let recipes = recipes_at_stage(
        &graph,
        &NodeId::from_parts("busybox", "do_build"),
        "do_populate_sysroot",
    );

    assert_eq!(recipes, vec!["quilt-native", "zlib", "busybox"]);
}

#[test]
fn missing_graph_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("task-depends.dot");

    let err = DependencyGraph::from_file(&RealFileSystem, &path).unwrap_err();

    match err {
        RebakeError::GraphFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}
