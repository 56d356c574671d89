//! Errors specific to the command line.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Outclass is not initialized in {0} (run `outclass init`)")]
    NotInitialized(PathBuf),

    #[error("card store {0} is missing")]
    MissingStore(PathBuf),

    #[error("no card matches \"{0}\"")]
    UnknownCard(String),

    #[error("no card catalog configured (set \"catalog\" in .outclass/config.json)")]
    NoCatalog,
}
