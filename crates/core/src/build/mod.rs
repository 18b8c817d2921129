//! Build orchestration: environment preparation, hooks, per-target freezing
//! and wheel bundling.

mod orchestrator;

pub use orchestrator::BuildOrchestrator;

use crate::console::{Console, Verbosity};
use crate::env::Environment;
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Mirrors the host build tool's `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFormat {
    Wheel,
    Sdist,
    PyInstaller,
}

impl BuildFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildFormat::Wheel => "wheel",
            BuildFormat::Sdist => "sdist",
            BuildFormat::PyInstaller => "pyinstaller",
        }
    }
}

impl fmt::Display for BuildFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wheel" => Ok(BuildFormat::Wheel),
            "sdist" => Ok(BuildFormat::Sdist),
            "pyinstaller" => Ok(BuildFormat::PyInstaller),
            other => Err(Error::ConfigError(format!(
                "Unsupported build format '{other}', expected one of wheel, sdist, pyinstaller"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Defaults to `<project>/dist`
    pub output_root: Option<PathBuf>,
    /// `None` freezes and then bundles
    pub format: Option<BuildFormat>,
    pub verbosity: Verbosity,
    /// Print synthesized commands without running anything
    pub dry_run: bool,
}

/// Everything a target needs while building
pub struct BuildContext<'a> {
    pub output_root: &'a Path,
    pub env: &'a dyn Environment,
    pub console: &'a Console,
    pub log_level: Level,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        output_root: &'a Path,
        env: &'a dyn Environment,
        console: &'a Console,
        log_level: Level,
    ) -> Self {
        Self {
            output_root,
            env,
            console,
            log_level,
        }
    }
}

/// What a build run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub built: Vec<String>,
    pub skipped: Vec<String>,
    /// Shell renderings, filled by dry runs only
    pub commands: Vec<String>,
    /// Archive entries appended to wheels
    pub bundled: Vec<String>,
    /// Wheel file names after platform retagging
    pub wheels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_format_parse() {
        assert_eq!("wheel".parse::<BuildFormat>().unwrap(), BuildFormat::Wheel);
        assert_eq!(
            "pyinstaller".parse::<BuildFormat>().unwrap(),
            BuildFormat::PyInstaller
        );
        assert!("exe".parse::<BuildFormat>().is_err());
        assert_eq!(BuildFormat::Sdist.to_string(), "sdist");
    }
}
