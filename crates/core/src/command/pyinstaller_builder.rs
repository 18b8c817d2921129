//! Argument synthesis for the freezing tool
//!
//! Arguments are emitted in a fixed order: core layout flags, boolean
//! switches, valued options, metadata, collection, data includes, hidden
//! imports and finally logging.

use super::PyInstallerCommand;
use crate::config::platform;
use crate::target::{CollectKind, Target};
use crate::utils::path::absolutize;
use std::path::Path;
use tracing::Level;

const PROGRAM: &str = "pyinstaller";

pub struct PyInstallerCommandBuilder<'a> {
    target: &'a Target,
    dist_path: &'a Path,
    level: Level,
    args: Vec<String>,
}

impl<'a> PyInstallerCommandBuilder<'a> {
    pub fn new(target: &'a Target, dist_path: &'a Path, level: Level) -> Self {
        Self {
            target,
            dist_path,
            level,
            args: Vec::new(),
        }
    }

    pub fn build(mut self) -> PyInstallerCommand {
        self.add_layout_args();
        self.add_switch_args();
        self.add_valued_args();
        self.add_metadata_args();
        self.add_collect_args();
        self.add_include_args();
        self.add_hidden_import_args();
        self.add_logging_args();
        PyInstallerCommand::new(PROGRAM, self.args)
    }

    fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    fn push_pair(&mut self, flag: &str, value: impl Into<String>) {
        self.push(flag);
        self.push(value);
    }

    fn add_layout_args(&mut self) {
        let target = self.target;
        let prog = target.prog();
        self.push(target.source().display().to_string());
        self.push(target.options().dist_type.flag());
        self.push_pair("--name", prog);
        self.push("--noconfirm");
        self.push("--clean");
        self.push_pair("--workpath", target.work_path().display().to_string());
        self.push_pair("--distpath", self.dist_path.display().to_string());
        self.push_pair(
            "--specpath",
            self.dist_path.join(".specs").display().to_string(),
        );
        self.push_pair("--contents-directory", format!("_{prog}_internal"));
    }

    fn add_switch_args(&mut self) {
        let options = self.target.options();
        if options.strip {
            self.push("--strip");
        }
        if options.no_upx {
            self.push("--noupx");
        }
        self.push(if options.console { "--console" } else { "--noconsole" });
        self.push(if options.windowed { "--windowed" } else { "--nowindowed" });
        if options.uac_admin {
            self.push("--uac-admin");
        }
        if options.uac_uiaccess {
            self.push("--uac-uiaccess");
        }
        if options.argv_emulation {
            self.push("--argv-emulation");
        }
    }

    fn add_valued_args(&mut self) {
        let options = self.target.options();
        if let Some(icon) = &options.icon {
            self.push_pair("--icon", icon);
        }
        if let Some(arch) = &options.arch {
            self.push_pair("--target-arch", arch);
        }
    }

    fn add_metadata_args(&mut self) {
        let options = self.target.options();
        for hook in &options.runtime_hooks {
            self.push_pair("--runtime-hook", hook);
        }
        for package in &options.copy_metadata {
            self.push_pair("--copy-metadata", package);
        }
        for package in &options.recursive_copy_metadata {
            self.push_pair("--recursive-copy-metadata", package);
        }
    }

    /// Unknown collection kinds are ignored
    fn add_collect_args(&mut self) {
        for (kind, modules) in &self.target.options().collect {
            let Some(kind) = CollectKind::from_key(kind) else {
                continue;
            };
            for module in modules {
                self.push_pair(kind.flag(), module);
            }
        }
    }

    fn add_include_args(&mut self) {
        let target = self.target;
        let root = target.project_root();
        let sep = platform::data_separator(target.platform());

        if !target.options().exclude_poetry_include {
            for path in target.host_includes() {
                let resolved = absolutize(root, path);
                self.push_pair("--add-data", format!("{}{sep}.", resolved.display()));
            }
        }

        for (source, destination) in &target.options().include {
            if source.is_empty() || destination.is_empty() {
                continue;
            }
            let resolved = absolutize(root, source);
            self.push_pair(
                "--add-data",
                format!("{}{sep}{destination}", resolved.display()),
            );
        }
    }

    fn add_hidden_import_args(&mut self) {
        for module in &self.target.options().hidden_imports {
            self.push_pair("--hidden-import", module);
        }
    }

    fn add_logging_args(&mut self) {
        match self.level {
            Level::INFO => self.push("--log-level=INFO"),
            Level::DEBUG => {
                self.push("--debug=all");
                self.push("--log-level=DEBUG");
            }
            _ => self.push("--log-level=WARN"),
        }
    }
}
