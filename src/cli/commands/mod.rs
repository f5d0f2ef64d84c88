mod build;
mod clean;

pub use build::{handle_build_command, BuildArgs};
pub use clean::handle_clean_command;

use std::path::{Path, PathBuf};

use crate::utils::path::absolutize;

/// Resolve a command-line path against the working directory
pub(crate) fn resolve_arg(path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    absolutize(&cwd, path)
}
