// src/exec/mod.rs

//! Process execution layer.
//!
//! Everything that talks to the outside build tool lives here:
//!
//! - [`cancel`] carries SIGINT / SIGTERM down to running children as a
//!   cancellation token.
//! - [`command`] runs one supervised child process in its own process group.
//! - [`backend`] provides the `BuildTool` trait and the `BitbakeTool`
//!   implementation used in production; tests swap in a fake.
//! - [`env`] parses `bitbake -e` output.
//! - [`extract`] runs an external recipe-list extractor.

pub mod backend;
pub mod cancel;
pub mod command;
pub mod env;
pub mod extract;

pub use backend::{BitbakeTool, BuildTool, ToolFuture};
pub use cancel::{cancel_pair, CancelHandle, CancelToken, Interruption};
pub use command::{run_supervised, terminate_process_group};
pub use env::BuildEnv;
pub use extract::RecipeExtractor;
