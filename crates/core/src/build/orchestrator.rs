use super::{BuildContext, BuildFormat, BuildOptions, BuildReport};
use crate::config::Project;
use crate::console::Console;
use crate::env::{Environment, to_args};
use crate::error::{Error, Result};
use crate::hooks::{HookInterface, HookKind, HookRegistry, PluginHook};
use crate::target::{BuildOutcome, Target};
use crate::wheel;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Drives a full build: targets are resolved from the project, frozen in
/// declaration order between the pre- and post-build hooks, then bundled.
pub struct BuildOrchestrator<'a> {
    project: &'a Project,
    env: &'a dyn Environment,
    console: &'a Console,
    hooks: HookRegistry,
    options: BuildOptions,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(
        project: &'a Project,
        env: &'a dyn Environment,
        console: &'a Console,
        options: BuildOptions,
    ) -> Self {
        Self {
            project,
            env,
            console,
            hooks: HookRegistry::new(),
            options,
        }
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn output_root(&self) -> PathBuf {
        self.options
            .output_root
            .clone()
            .unwrap_or_else(|| self.project.root().join("dist"))
    }

    /// Every declared target, in declaration order
    pub fn targets(&self) -> Result<Vec<Target>> {
        self.project
            .target_names()?
            .iter()
            .map(|name| Target::new(name, self.project))
            .collect()
    }

    fn should_freeze(&self, targets: &[Target]) -> bool {
        match self.options.format {
            Some(BuildFormat::Sdist) => false,
            Some(BuildFormat::Wheel) => targets.iter().any(Target::is_bundled),
            Some(BuildFormat::PyInstaller) | None => true,
        }
    }

    pub fn run(&self) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        let mut targets = self.targets()?;

        if targets.is_empty() {
            self.console
                .warning("No targets definition found, nothing to build with pyinstaller.");
            return Ok(report);
        }

        if !self.should_freeze(&targets) {
            debug!(
                "Nothing to freeze for format {:?}",
                self.options.format.map(BuildFormat::as_str)
            );
            return Ok(report);
        }

        let output_root = self.output_root();

        if self.options.dry_run {
            return self.plan(&mut targets, &output_root, report);
        }

        self.prepare_environment()?;

        let (major, minor) = self.env.python_version()?;
        self.console.log(&format!(
            "Building binaries with PyInstaller Python {major}.{minor} [{}]",
            self.project.platform()
        ));

        self.run_hook(HookKind::Pre)?;

        let ctx = BuildContext::new(
            &output_root,
            self.env,
            self.console,
            self.options.verbosity.log_level(),
        );
        for target in &mut targets {
            match target.build(&ctx)? {
                BuildOutcome::Built => report.built.push(target.prog().to_string()),
                BuildOutcome::Skipped => report.skipped.push(target.prog().to_string()),
            }
        }

        self.run_hook(HookKind::Post)?;

        if self.options.format != Some(BuildFormat::PyInstaller) {
            self.bundle(&targets, &output_root, &mut report)?;
        }

        info!(
            "Build finished: {} built, {} skipped",
            report.built.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn plan(
        &self,
        targets: &mut [Target],
        output_root: &Path,
        mut report: BuildReport,
    ) -> Result<BuildReport> {
        let level = self.options.verbosity.log_level();
        for target in targets.iter_mut() {
            target.set_dist_path(target.dist_path_for(output_root));
            if target.skip() {
                report.skipped.push(target.prog().to_string());
                continue;
            }
            let command = target.pyinstaller_command(level)?.to_shell_command();
            self.console.log(&command);
            report.commands.push(command);
        }
        Ok(report)
    }

    fn prepare_environment(&self) -> Result<()> {
        let package = match self.project.pyinstaller_version()? {
            Some(version) => format!("pyinstaller=={version}"),
            None => "pyinstaller".to_string(),
        };
        let output = self.env.run_pip(&to_args(&[
            "install",
            "--disable-pip-version-check",
            "--force-reinstall",
            "--no-input",
            package.as_str(),
        ]))?;
        self.console.debug_command(&output);

        let version = self.env.run("pyinstaller", &to_args(&["--version"]))?;
        self.console.log(&format!(
            "Preparing PyInstaller {} environment {}",
            version.trim(),
            self.env.path().display()
        ));

        let output = self.env.run_pip(&to_args(&[
            "install",
            "--disable-pip-version-check",
            "--ignore-installed",
            "--no-input",
            "certifi",
            "cffi",
        ]))?;
        self.console.debug_command(&output);
        Ok(())
    }

    /// Missing hook modules degrade to a warning
    fn run_hook(&self, kind: HookKind) -> Result<()> {
        let Some(name) = self.project.plugin_config()?.get_str(kind.config_key())? else {
            return Ok(());
        };

        let hook = match PluginHook::resolve(kind, &name, self.project, &self.hooks) {
            Ok(hook) => hook,
            Err(Error::HookResolution(msg)) => {
                self.console
                    .warning(&format!("Skipping {kind}-build hook, {msg}"));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let interface = HookInterface::new(kind, &name, self.console, self.env, self.project);
        hook.exec(&interface)
    }

    fn bundle(
        &self,
        targets: &[Target],
        output_root: &Path,
        report: &mut BuildReport,
    ) -> Result<()> {
        let bundled: Vec<&Target> = targets
            .iter()
            .filter(|t| t.is_bundled() && report.built.iter().any(|b| b == t.prog()))
            .collect();
        if bundled.is_empty() {
            return Ok(());
        }

        let wheels = wheel::universal_wheels(output_root)?;
        if wheels.is_empty() {
            self.console.warning(&format!(
                "No universal wheel found in {}, skipping bundling.",
                output_root.display()
            ));
            return Ok(());
        }

        for wheel_name in &wheels {
            for target in &bundled {
                let entries = target.bundle_to_wheel(output_root, wheel_name, self.console)?;
                report.bundled.extend(entries);
            }
        }

        report.wheels =
            wheel::replace_platform_tag(output_root, self.project.platform(), self.console)?;
        Ok(())
    }
}
