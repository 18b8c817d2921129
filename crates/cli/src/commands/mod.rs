pub mod build;
pub mod show;
pub mod targets;

pub use build::{BuildArgs, build_command};
pub use show::show_command;
pub use targets::targets_command;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The project directory, defaulting to the current directory
pub(crate) fn project_dir(project: Option<&Path>) -> Result<PathBuf> {
    let dir = match project {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    if !dir.join(pyinstaller_runner_core::config::MANIFEST_FILE).is_file() {
        anyhow::bail!("No pyproject.toml found in {}", dir.display());
    }
    Ok(dir)
}
