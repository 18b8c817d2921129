//! The project being built: its root directory, manifest and platform

use super::{platform, LayeredConfig};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plugin namespace inside `pyproject.toml`
pub const PLUGIN_SECTION: &str = "tool.poetry-pyinstaller-plugin";

/// Include rules inherited from the host build tool
pub const HOST_INCLUDE: &str = "tool.poetry.include";

pub const MANIFEST_FILE: &str = "pyproject.toml";

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: LayeredConfig,
    platform: String,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: LayeredConfig, platform: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            config,
            platform: platform.into(),
        }
    }

    /// Load `<dir>/pyproject.toml`
    pub fn load(dir: &Path, platform: impl Into<String>) -> Result<Self> {
        let root = dir.canonicalize()?;
        let manifest = root.join(MANIFEST_FILE);
        debug!("Loading manifest from {:?}", manifest);
        let contents = fs::read_to_string(&manifest)?;
        Self::from_manifest_str(root, &contents, platform)
    }

    pub fn from_manifest_str(
        root: impl Into<PathBuf>,
        contents: &str,
        platform: impl Into<String>,
    ) -> Result<Self> {
        let value: toml::Value = toml::from_str(contents)?;
        Ok(Self::new(root, LayeredConfig::new(value), platform))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LayeredConfig {
        &self.config
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn set_platform(&mut self, platform: impl Into<String>) {
        self.platform = platform.into();
    }

    pub fn plugin_config(&self) -> Result<LayeredConfig> {
        self.config.section(PLUGIN_SECTION)
    }

    /// Declared target names, in declaration order
    pub fn target_names(&self) -> Result<Vec<String>> {
        let targets = self.plugin_config()?.section("targets")?;
        Ok(match targets.data() {
            Some(toml::Value::Table(table)) => table.keys().cloned().collect(),
            _ => Vec::new(),
        })
    }

    /// `tool.poetry-pyinstaller-plugin.version`, the PyInstaller pin
    pub fn pyinstaller_version(&self) -> Result<Option<String>> {
        self.plugin_config()?.get_str("version")
    }

    /// Directories that may contain importable project modules
    pub fn base_module_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = vec![self.root.clone()];

        if let Some(toml::Value::Array(packages)) = self.config.get("tool.poetry.packages")? {
            for package in packages {
                if let Some(from) = package.get("from").and_then(|v| v.as_str()) {
                    let base = self.root.join(from);
                    if !paths.contains(&base) {
                        paths.push(base);
                    }
                }
            }
        }

        let src = self.root.join("src");
        if src.is_dir() && !paths.contains(&src) {
            paths.push(src);
        }

        Ok(paths)
    }

    pub fn is_windows(&self) -> bool {
        platform::is_windows(&self.platform)
    }
}
