// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{RebakeError, Result};
use crate::plan::artifacts::compile_artifact_patterns;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RebakeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.build, raw.tool))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_names(cfg)?;
    validate_targets(cfg)?;
    validate_artifacts(cfg)?;
    Ok(())
}

fn validate_names(cfg: &RawConfigFile) -> Result<()> {
    let required = [
        ("[build].target", cfg.build.target.as_str()),
        ("[build].default_task", cfg.build.default_task.as_str()),
        ("[build].build_task", cfg.build.build_task.as_str()),
        ("[build].clean_task", cfg.build.clean_task.as_str()),
        ("[build].provided_var", cfg.build.provided_var.as_str()),
        ("[tool].program", cfg.tool.program.as_str()),
        ("[tool].graph_file", cfg.tool.graph_file.as_str()),
    ];

    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(RebakeError::Config(format!("{key} must not be empty")));
        }
    }
    Ok(())
}

fn validate_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.exclude_target() == Some(cfg.build.target.as_str()) {
        return Err(RebakeError::Config(format!(
            "target '{}' cannot also be the exclude target",
            cfg.build.target
        )));
    }
    Ok(())
}

fn validate_artifacts(cfg: &RawConfigFile) -> Result<()> {
    compile_artifact_patterns(&cfg.tool.artifacts)
        .map(|_| ())
        .map_err(|e| RebakeError::Config(format!("[tool].artifacts: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.build.target, "core-image-base");
        assert_eq!(cfg.exclude_target(), Some("pseudo-native"));
        assert_eq!(cfg.tool.artifacts, vec!["*.dot", "pn-buildlist"]);
    }

    #[test]
    fn empty_program_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.tool.program = " ".to_string();

        match ConfigFile::try_from(raw) {
            Err(RebakeError::Config(msg)) => assert!(msg.contains("[tool].program")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn target_equal_to_exclude_target_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.build.target = "pseudo-native".to_string();
        assert!(matches!(ConfigFile::try_from(raw), Err(RebakeError::Config(_))));
    }

    #[test]
    fn blank_exclude_target_disables_exclusion() {
        let mut raw = RawConfigFile::default();
        raw.build.exclude_target = Some(String::new());
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(cfg.exclude_target(), None);
    }

    #[test]
    fn bad_artifact_glob_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.tool.artifacts = vec!["[unclosed".to_string()];
        match ConfigFile::try_from(raw) {
            Err(RebakeError::Config(msg)) => assert!(msg.contains("artifacts")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
