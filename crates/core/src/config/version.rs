//! Package version resolution
//!
//! Sources in increasing precedence (last value wins, no conflict
//! diagnostics): `project.version`, `tool.poetry.version`, then the
//! dynamic-versioning plugin when `tool.poetry-dynamic-versioning.enable`.

use super::LayeredConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use tracing::debug;

/// A PEP 440 version of the package being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion(pep440_rs::Version);

impl PackageVersion {
    pub fn parse(version: &str) -> Result<Self> {
        pep440_rs::Version::from_str(version.trim())
            .map(Self)
            .map_err(|e| Error::ConfigError(format!("Invalid package version '{version}': {e}")))
    }

    /// Pre-releases and dev releases are unstable
    pub fn is_unstable(&self) -> bool {
        self.0.is_pre() || self.0.is_dev()
    }

    pub fn is_stable(&self) -> bool {
        !self.is_unstable()
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

pub fn resolve_package_version(config: &LayeredConfig, project_root: &Path) -> Result<PackageVersion> {
    let mut version = config.get_str("project.version")?;

    if let Some(poetry_version) = config.get_str("tool.poetry.version")? {
        version = Some(poetry_version);
    }

    if config.get_bool("tool.poetry-dynamic-versioning.enable", false)? {
        version = Some(dynamic_version(project_root)?);
    }

    let version = version.ok_or_else(|| {
        Error::ConfigError(
            "Unable to resolve package version from 'project.version', \
             'tool.poetry.version' or poetry-dynamic-versioning"
                .to_string(),
        )
    })?;
    debug!("Resolved package version: {}", version);
    PackageVersion::parse(&version)
}

/// Latest reachable git tag, with the conventional `v` prefix removed
fn dynamic_version(project_root: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .current_dir(project_root)
        .output()?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            command: "git describe --tags --abbrev=0".to_string(),
            status: output.status.to_string(),
            output: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(tag.strip_prefix('v').unwrap_or(&tag).to_string())
}
