#![allow(dead_code)]

use std::path::PathBuf;

use rebake::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn target(mut self, target: &str) -> Self {
        self.config.build.target = target.to_string();
        self
    }

    pub fn exclude_target(mut self, target: &str) -> Self {
        self.config.build.exclude_target = Some(target.to_string());
        self
    }

    pub fn no_exclude(mut self) -> Self {
        self.config.build.exclude_target = None;
        self
    }

    pub fn clean(mut self, clean: bool) -> Self {
        self.config.build.clean = clean;
        self
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tool.build_dir = dir.into();
        self
    }

    pub fn extractor(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.tool.extractor = Some(program.into());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for dot text in the shape `bitbake -g` writes.
#[derive(Debug, Clone, Default)]
pub struct DotGraphBuilder {
    lines: Vec<String>,
}

impl DotGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node declaration line (ignored by the parser, present in real files).
    pub fn node(mut self, id: &str) -> Self {
        let (recipe, task) = id.split_once('.').unwrap_or((id, ""));
        self.lines
            .push(format!("\"{id}\" [label=\"{recipe} {task}\\n:1.0-r0\"]"));
        self
    }

    pub fn edge(mut self, src: &str, dest: &str) -> Self {
        self.lines.push(format!("\"{src}\" -> \"{dest}\""));
        self
    }

    pub fn dashed_edge(mut self, src: &str, dest: &str) -> Self {
        self.lines
            .push(format!("\"{src}\" -> \"{dest}\" [style=dashed]"));
        self
    }

    /// `<recipe>.do_build` depends on `<recipe>.do_populate_sysroot`, and
    /// that on each dependency's `do_populate_sysroot`.
    pub fn recipe(mut self, recipe: &str, deps: &[&str]) -> Self {
        let build = format!("{recipe}.do_build");
        let sysroot = format!("{recipe}.do_populate_sysroot");
        self = self.node(&build).node(&sysroot).edge(&build, &sysroot);
        for dep in deps {
            self = self.edge(&sysroot, &format!("{dep}.do_populate_sysroot"));
        }
        self
    }

    pub fn build(self) -> String {
        let mut out = String::from("digraph depends {\n");
        for line in self.lines {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}
