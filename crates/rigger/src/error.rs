//! Error types for the command-line crate.

use std::path::PathBuf;

use rigger_engine::RiggerError;
use thiserror::Error;

use crate::output::SerializeError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no stylesheet to rewrite; pass --css or set `stylesheet` in rigger.yaml")]
    NoStylesheet,

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Engine(#[from] RiggerError),
}

pub type Result<T> = std::result::Result<T, CliError>;
