//! Resolved per-target options and their closed value sets

use crate::config::PackageVersion;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Output layout produced by the freezing tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistType {
    #[default]
    OneDir,
    OneFile,
}

impl DistType {
    pub const VALUES: [&'static str; 2] = ["onefile", "onedir"];

    pub fn parse(prog: &str, value: &str) -> Result<Self> {
        match value {
            "onedir" => Ok(DistType::OneDir),
            "onefile" => Ok(DistType::OneFile),
            other => Err(Error::ConfigError(format!(
                "Unsupported distribution type for target '{prog}', '{other}' not in ['onefile', 'onedir']."
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistType::OneDir => "onedir",
            DistType::OneFile => "onefile",
        }
    }

    pub fn flag(self) -> String {
        format!("--{}", self.as_str())
    }
}

impl fmt::Display for DistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build gating policy (`when`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum When {
    #[default]
    Always,
    Release,
    Prerelease,
}

impl When {
    pub fn parse(prog: &str, value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(When::Always),
            Some("release") => Ok(When::Release),
            Some("prerelease") => Ok(When::Prerelease),
            Some(other) => Err(Error::ConfigError(format!(
                "Unsupported value for field 'when' for target '{prog}', '{other}' not in ['release', 'prerelease']."
            ))),
        }
    }

    pub fn as_str(self) -> Option<&'static str> {
        match self {
            When::Always => None,
            When::Release => Some("release"),
            When::Prerelease => Some("prerelease"),
        }
    }

    /// Whether a build at `version` is excluded by this policy
    pub fn skips(self, version: &PackageVersion) -> bool {
        match self {
            When::Always => false,
            When::Release => version.is_unstable(),
            When::Prerelease => version.is_stable(),
        }
    }
}

/// Module collection modes understood by the freezing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectKind {
    Submodules,
    Data,
    Binaries,
    All,
}

impl CollectKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "submodules" => Some(CollectKind::Submodules),
            "data" => Some(CollectKind::Data),
            "binaries" => Some(CollectKind::Binaries),
            "all" => Some(CollectKind::All),
            _ => None,
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            CollectKind::Submodules => "--collect-submodules",
            CollectKind::Data => "--collect-data",
            CollectKind::Binaries => "--collect-binaries",
            CollectKind::All => "--collect-all",
        }
    }
}

/// Every option of a target after target-level → plugin-level → default
/// resolution. Mappings keep their declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetOptions {
    pub dist_type: DistType,
    pub bundle: bool,
    pub strip: bool,
    pub no_upx: bool,
    pub console: bool,
    pub windowed: bool,
    pub icon: Option<String>,
    pub uac_admin: bool,
    pub uac_uiaccess: bool,
    pub argv_emulation: bool,
    pub arch: Option<String>,
    pub hidden_imports: Vec<String>,
    pub when: When,
    pub add_version: bool,
    pub certificates: Vec<String>,
    pub collect: Vec<(String, Vec<String>)>,
    pub exclude_poetry_include: bool,
    pub include: Vec<(String, String)>,
    pub runtime_hooks: Vec<String>,
    pub copy_metadata: Vec<String>,
    pub recursive_copy_metadata: Vec<String>,
    pub package: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(v: &str) -> PackageVersion {
        PackageVersion::parse(v).unwrap()
    }

    #[test]
    fn test_dist_type_parse() {
        assert_eq!(DistType::parse("t", "onedir").unwrap(), DistType::OneDir);
        assert_eq!(DistType::parse("t", "onefile").unwrap(), DistType::OneFile);
        let err = DistType::parse("my-tool-2", "not_a_type").unwrap_err();
        assert!(err.to_string().contains(
            "Unsupported distribution type for target 'my-tool-2', 'not_a_type' not in ['onefile', 'onedir']."
        ));
    }

    #[test]
    fn test_when_parse() {
        assert_eq!(When::parse("t", None).unwrap(), When::Always);
        assert_eq!(When::parse("t", Some("release")).unwrap(), When::Release);
        let err = When::parse("my-tool-2", Some("sunshine")).unwrap_err();
        assert!(err.to_string().contains(
            "Unsupported value for field 'when' for target 'my-tool-2', 'sunshine' not in ['release', 'prerelease']."
        ));
    }

    #[test]
    fn test_skip_policy() {
        for v in ["1.0.0", "1.0.0-a0", "1.0.0.dev0"] {
            assert!(!When::Always.skips(&version(v)));
        }

        assert!(!When::Release.skips(&version("1.0.0")));
        assert!(When::Release.skips(&version("1.0.0-a0")));
        assert!(When::Release.skips(&version("1.0.0.dev0")));

        assert!(When::Prerelease.skips(&version("1.0.0")));
        assert!(!When::Prerelease.skips(&version("1.0.0-a0")));
        assert!(!When::Prerelease.skips(&version("1.0.0.dev0")));
    }

    #[test]
    fn test_collect_kind() {
        assert_eq!(CollectKind::from_key("data"), Some(CollectKind::Data));
        assert_eq!(CollectKind::from_key("datas"), None);
        assert_eq!(CollectKind::All.flag(), "--collect-all");
    }
}
