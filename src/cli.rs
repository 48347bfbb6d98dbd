// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;

/// Command-line arguments for `rebake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rebake",
    version,
    about = "Clean and rebuild every recipe a BitBake target depends on, in build order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Rebake.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REBAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Clean and rebuild each recipe needed by TARGET, dependencies first.
    Rebuild(RebuildArgs),

    /// Print the recipes `rebuild` would process, one per line.
    Recipes(TargetArgs),

    /// Print every `recipe.task` NODE depends on in a dot graph, in build order.
    Deps {
        /// Graph file written by `bitbake -g` (e.g. `task-depends.dot`).
        #[arg(value_name = "DOTFILE")]
        dotfile: PathBuf,

        /// Start node, e.g. `core-image-base.do_build`.
        #[arg(value_name = "NODE")]
        node: String,
    },
}

/// Target selection shared by `rebuild` and `recipes`.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Target to rebuild (defaults to `[build].target`).
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Recipes needed by this target are treated as already built.
    #[arg(long, value_name = "TARGET", conflicts_with = "no_exclude")]
    pub exclude_target: Option<String>,

    /// Do not exclude any baseline target's recipes.
    #[arg(long)]
    pub no_exclude: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RebuildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Skip the clean step before each rebuild.
    #[arg(long)]
    pub no_clean: bool,
}

impl TargetArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target: self.target.clone(),
            exclude_target: self.exclude_target.clone(),
            no_exclude: self.no_exclude,
            no_clean: false,
        }
    }
}

impl RebuildArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            no_clean: self.no_clean,
            ..self.target.overrides()
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
