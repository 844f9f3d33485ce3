//! Command-line front end for [`rigger_engine`].
//!
//! The binary is a thin shell over [`commands::execute`]: it parses
//! [`cli::Cli`], installs logging and prints what the handler returns. The
//! pieces live here so they can be tested without a process boundary.
//!
//! - [`fs_project::FsProject`] implements the engine's `ProjectSource` over a
//!   directory, walked once with exclusions from [`config::RiggerConfig`].
//! - [`output::OutputMode`] picks styled text, plain text, JSON or YAML.
//! - [`diff`] renders planned rewrites as unified diffs.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod fs_project;
pub mod output;
pub mod render;

pub use cli::{Cli, Command};
pub use commands::execute;
pub use config::RiggerConfig;
pub use error::{CliError, Result};
pub use fs_project::FsProject;
pub use output::OutputMode;
