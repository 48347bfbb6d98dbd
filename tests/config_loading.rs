// tests/config_loading.rs

use std::path::{Path, PathBuf};

use rebake::config::{load_and_validate, load_or_default, ConfigOverrides};
use rebake::errors::RebakeError;
use rebake::fs::mock::MockFileSystem;
use rebake::fs::RealFileSystem;

const CONFIG: &str = r#"
[build]
target = "core-image-minimal"
exclude_target = "pseudo-native"
clean = false

[tool]
build_dir = "build"
artifacts = ["*.dot", "pn-buildlist", "*.log"]
"#;

#[test]
fn values_from_file_replace_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Rebake.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let cfg = load_and_validate(&RealFileSystem, Some(path.as_path()), &ConfigOverrides::default()).unwrap();

    assert_eq!(cfg.build.target, "core-image-minimal");
    assert_eq!(cfg.exclude_target(), Some("pseudo-native"));
    assert!(!cfg.build.clean);
    assert_eq!(cfg.tool.build_dir, PathBuf::from("build"));
    assert_eq!(cfg.tool.artifacts.len(), 3);
    // Untouched keys keep their defaults.
    assert_eq!(cfg.tool.program, "bitbake");
    assert_eq!(cfg.build.build_task, "do_populate_sysroot");
}

#[test]
fn missing_default_file_means_defaults() {
    let fs = MockFileSystem::new();

    let raw = load_or_default(&fs, None).unwrap();

    assert_eq!(raw.build.target, "core-image-base");
    assert_eq!(raw.build.exclude_target.as_deref(), Some("pseudo-native"));
    assert!(raw.build.clean);
    assert_eq!(raw.tool.graph_file, "task-depends.dot");
    assert!(raw.tool.extractor.is_none());
}

#[test]
fn default_file_is_picked_up_when_present() {
    let fs = MockFileSystem::new();
    fs.add_file("Rebake.toml", "[build]\ntarget = \"busybox\"\n");

    let raw = load_or_default(&fs, None).unwrap();

    assert_eq!(raw.build.target, "busybox");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let fs = MockFileSystem::new();

    let err = load_or_default(&fs, Some(Path::new("missing.toml"))).unwrap_err();

    assert!(matches!(err, RebakeError::Config(_)));
}

#[test]
fn unknown_keys_are_rejected() {
    let fs = MockFileSystem::new();
    fs.add_file("Rebake.toml", "[build]\ntargte = \"busybox\"\n");

    let err = load_or_default(&fs, None).unwrap_err();

    assert!(matches!(err, RebakeError::Toml(_)));
}

#[test]
fn command_line_overrides_win() {
    let fs = MockFileSystem::new();
    fs.add_file("Rebake.toml", CONFIG);

    let overrides = ConfigOverrides {
        target: Some("busybox".to_string()),
        exclude_target: None,
        no_exclude: true,
        no_clean: false,
    };
    let cfg = load_and_validate(&fs, None, &overrides).unwrap();

    assert_eq!(cfg.build.target, "busybox");
    assert_eq!(cfg.exclude_target(), None);
    assert!(!cfg.build.clean);
}

#[test]
fn empty_exclude_target_disables_the_baseline() {
    let fs = MockFileSystem::new();
    fs.add_file("Rebake.toml", "[build]\nexclude_target = \"\"\n");

    let cfg = load_and_validate(&fs, None, &ConfigOverrides::default()).unwrap();

    assert_eq!(cfg.exclude_target(), None);
}

#[test]
fn target_equal_to_baseline_is_rejected() {
    let fs = MockFileSystem::new();
    let overrides = ConfigOverrides {
        target: Some("pseudo-native".to_string()),
        ..ConfigOverrides::default()
    };

    let err = load_and_validate(&fs, None, &overrides).unwrap_err();

    assert!(matches!(err, RebakeError::Config(_)));
}

#[test]
fn bad_artifact_pattern_is_rejected() {
    let fs = MockFileSystem::new();
    fs.add_file("Rebake.toml", "[tool]\nartifacts = [\"a[\"]\n");

    let err = load_and_validate(&fs, None, &ConfigOverrides::default()).unwrap_err();

    assert!(matches!(err, RebakeError::Config(_)));
}
