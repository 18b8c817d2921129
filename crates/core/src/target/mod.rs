//! Build targets
//!
//! A target is one declared `(name, entry script, options)` unit under
//! `[tool.poetry-pyinstaller-plugin.targets]`. Every option resolves through
//! the target's own table first, then the plugin table, then a hard-coded
//! default.

mod build;
mod bundle;
mod options;

pub use build::BuildOutcome;
pub use options::{CollectKind, DistType, TargetOptions, When};

use crate::command::{PyInstallerCommand, PyInstallerCommandBuilder};
use crate::config::{
    HOST_INCLUDE, LayeredConfig, PLUGIN_SECTION, PackageVersion, Project, expect_bool,
    expect_string, expect_string_list, expect_string_or_list, expect_table,
    resolve_package_version,
};
use crate::error::{Error, Result};
use crate::utils::path::absolutize;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{Level, debug};

/// Two-level option lookup: target table, then plugin table
struct FieldResolver {
    target: LayeredConfig,
    plugin: LayeredConfig,
}

impl FieldResolver {
    fn lookup(&self, field: &str) -> Result<Option<&Value>> {
        match self.target.get(field)? {
            Some(value) => Ok(Some(value)),
            None => self.plugin.get(field),
        }
    }

    fn bool(&self, field: &str, default: bool) -> Result<bool> {
        self.lookup(field)?
            .map_or(Ok(default), |v| expect_bool(field, v))
    }

    /// Empty strings count as unset
    fn string(&self, field: &str) -> Result<Option<String>> {
        Ok(self
            .lookup(field)?
            .map(|v| expect_string(field, v))
            .transpose()?
            .filter(|s| !s.is_empty()))
    }

    fn string_list(&self, field: &str) -> Result<Vec<String>> {
        self.lookup(field)?
            .map_or(Ok(Vec::new()), |v| expect_string_list(field, v))
    }

    fn string_or_list(&self, field: &str) -> Result<Vec<String>> {
        let items = self
            .lookup(field)?
            .map_or(Ok(Vec::new()), |v| expect_string_or_list(field, v))?;
        Ok(items.into_iter().filter(|s| !s.is_empty()).collect())
    }

    fn string_map(&self, field: &str) -> Result<Vec<(String, String)>> {
        let Some(value) = self.lookup(field)? else {
            return Ok(Vec::new());
        };
        expect_table(field, value)?
            .iter()
            .map(|(k, v)| Ok((k.clone(), expect_string(&format!("{field}.{k}"), v)?)))
            .collect()
    }

    fn list_map(&self, field: &str) -> Result<Vec<(String, Vec<String>)>> {
        let Some(value) = self.lookup(field)? else {
            return Ok(Vec::new());
        };
        expect_table(field, value)?
            .iter()
            .map(|(k, v)| Ok((k.clone(), expect_string_or_list(&format!("{field}.{k}"), v)?)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Target {
    prog: String,
    source: PathBuf,
    platform: String,
    package_version: PackageVersion,
    project_root: PathBuf,
    work_path: PathBuf,
    dist_path: Option<PathBuf>,
    host_includes: Vec<String>,
    options: TargetOptions,
}

impl Target {
    /// Resolve and validate the target named `prog` from the project manifest
    pub fn new(prog: &str, project: &Project) -> Result<Self> {
        let global = project.config();
        let plugin = global.section(PLUGIN_SECTION)?;
        let raw = plugin
            .section("targets")?
            .data()
            .and_then(|targets| targets.get(prog))
            .cloned();

        // `<prog> = "script.py"` is shorthand for `<prog> = { source = "script.py" }`
        let target = match raw {
            Some(table @ Value::Table(_)) => LayeredConfig::new(table),
            Some(scalar) => {
                let mut table = Table::new();
                table.insert("source".to_string(), scalar);
                LayeredConfig::new(Value::Table(table))
            }
            None => LayeredConfig::new(Value::Table(Table::new())),
        };
        let fields = FieldResolver { target, plugin };

        let source = fields
            .string("source")?
            .ok_or_else(|| Error::ConfigError(format!("Missing 'source' for target '{prog}'")))?;
        let project_root = project.root().to_path_buf();
        let source = absolutize(&project_root, &source);
        let platform = project.platform().to_string();
        let package_version = resolve_package_version(global, &project_root)?;
        let work_path = absolutize(&project_root, Path::new("build").join(&platform));

        let dist_type = fields.string("type")?.unwrap_or_else(|| "onedir".to_string());
        let when = fields.string("when")?;

        let mut options = TargetOptions {
            dist_type: DistType::default(),
            bundle: fields.bool("bundle", false)?,
            strip: fields.bool("strip", false)?,
            no_upx: fields.bool("no-upx", false)?,
            console: fields.bool("console", false)?,
            windowed: fields.bool("windowed", false)?,
            icon: fields.string("icon")?,
            uac_admin: fields.bool("uac-admin", false)?,
            uac_uiaccess: fields.bool("uac-uiaccess", false)?,
            argv_emulation: fields.bool("argv-emulation", false)?,
            arch: fields.string("arch")?,
            hidden_imports: fields.string_or_list("hidden-import")?,
            when: When::default(),
            add_version: fields.bool("add-version", false)?,
            certificates: fields.string_list("certifi.append")?,
            collect: fields.list_map("collect")?,
            exclude_poetry_include: fields.bool("exclude-poetry-include", false)?,
            include: fields.string_map("include")?,
            runtime_hooks: fields.string_list("runtime-hooks")?,
            copy_metadata: fields.string_list("copy-metadata")?,
            recursive_copy_metadata: fields.string_list("recursive-copy-metadata")?,
            package: fields.string_map("package")?,
        };

        let mut prog = prog.to_string();
        if options.add_version {
            prog = format!("{prog}-{package_version}");
        }

        options.dist_type = DistType::parse(&prog, &dist_type)?;
        options.when = When::parse(&prog, when.as_deref())?;

        let host_includes = host_includes(global)?;

        debug!("Resolved target '{}': {:?}", prog, options);

        Ok(Self {
            prog,
            source,
            platform,
            package_version,
            project_root,
            work_path,
            dist_path: None,
            host_includes,
            options,
        })
    }

    pub fn prog(&self) -> &str {
        &self.prog
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn package_version(&self) -> &PackageVersion {
        &self.package_version
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn work_path(&self) -> &Path {
        &self.work_path
    }

    pub fn dist_path(&self) -> Option<&Path> {
        self.dist_path.as_deref()
    }

    pub fn set_dist_path(&mut self, path: impl Into<PathBuf>) {
        self.dist_path = Some(path.into());
    }

    pub fn options(&self) -> &TargetOptions {
        &self.options
    }

    /// Include paths inherited from `tool.poetry.include`
    pub fn host_includes(&self) -> &[String] {
        &self.host_includes
    }

    pub fn is_bundled(&self) -> bool {
        self.options.bundle
    }

    /// Whether the `when` policy excludes the current package version
    pub fn skip(&self) -> bool {
        self.options.when.skips(&self.package_version)
    }

    /// `<output_root>/pyinstaller/<platform>`
    pub fn dist_path_for(&self, output_root: &Path) -> PathBuf {
        output_root.join("pyinstaller").join(&self.platform)
    }

    /// The produced executable (onefile) or directory (onedir)
    pub fn artifact_path(&self, output_root: &Path) -> PathBuf {
        let dist = self.dist_path_for(output_root);
        match self.options.dist_type {
            DistType::OneDir => dist.join(&self.prog),
            DistType::OneFile if crate::config::platform::is_windows(&self.platform) => {
                dist.join(format!("{}.exe", self.prog))
            }
            DistType::OneFile => dist.join(&self.prog),
        }
    }

    pub fn pyinstaller_command(&self, level: Level) -> Result<PyInstallerCommand> {
        let dist_path = self.dist_path.as_deref().ok_or_else(|| {
            Error::CommandNotReady(format!("dist path of target '{}' is not assigned", self.prog))
        })?;
        Ok(PyInstallerCommandBuilder::new(self, dist_path, level).build())
    }

    /// Full argument vector for the freezing tool, program name first
    pub fn command(&self, level: Level) -> Result<Vec<String>> {
        Ok(self.pyinstaller_command(level)?.argv())
    }
}

fn host_includes(global: &LayeredConfig) -> Result<Vec<String>> {
    let Some(value) = global.get(HOST_INCLUDE)? else {
        return Ok(Vec::new());
    };
    let Some(items) = value.as_array() else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::String(path) => Some(path.clone()),
            Value::Table(table) => table.get("path").and_then(|p| p.as_str()).map(str::to_string),
            _ => None,
        })
        .filter(|path| !path.is_empty())
        .collect())
}
