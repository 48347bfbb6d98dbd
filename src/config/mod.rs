// src/config/mod.rs

//! Configuration loading and validation for rebake.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate basic invariants before anything runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_or_default};
pub use model::{BuildSection, ConfigFile, ConfigOverrides, RawConfigFile, ToolSection};
