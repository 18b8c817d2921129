//! Freezing a single target inside the build environment

use super::{DistType, Target};
use crate::build::BuildContext;
use crate::env::{display_command, to_args};
use crate::error::{Error, Result};
use crate::utils::path::absolutize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built,
    Skipped,
}

impl Target {
    /// Freeze this target into `<output_root>/pyinstaller/<platform>`.
    ///
    /// The dist path is assigned even when the `when` policy skips the build.
    pub fn build(&mut self, ctx: &BuildContext<'_>) -> Result<BuildOutcome> {
        self.set_dist_path(self.dist_path_for(ctx.output_root));

        if self.skip() {
            ctx.console.warning(&format!(
                " - Skipping {} (on {} only)",
                self.prog,
                self.options.when.as_str().unwrap_or("always")
            ));
            return Ok(BuildOutcome::Skipped);
        }

        ctx.console.log(&format!("  - Building {}", self.prog));

        self.install_dependencies(ctx)?;
        self.append_certificates(ctx)?;
        self.freeze(ctx)?;
        self.copy_package_files(ctx)?;

        ctx.console.log(&format!("  - Built {}", self.prog));
        Ok(BuildOutcome::Built)
    }

    fn install_dependencies(&self, ctx: &BuildContext<'_>) -> Result<()> {
        let args = to_args(&["install", "--all-extras", "--all-groups"]);
        ctx.console
            .debug(&format!("run '{}'", display_command("poetry", &args)));
        let output = ctx.env.run_in(&self.project_root, "poetry", &args)?;
        ctx.console.debug_command(&output);
        Ok(())
    }

    fn append_certificates(&self, ctx: &BuildContext<'_>) -> Result<()> {
        for certificate in &self.options.certificates {
            ctx.console
                .log(&format!("  - Adding {certificate} to certifi"));
            let path = absolutize(&self.project_root, certificate);
            let literal = serde_json::to_string(&path.to_string_lossy())?;
            let script = format!(
                "import certifi\n\
                 print(certifi.where())\n\
                 with open({literal}, 'r') as include:\n\
                 \x20   with open(certifi.where(), 'a') as cert:\n\
                 \x20       cert.write(include.read())\n"
            );
            let output = ctx.env.run_script(&script)?;
            ctx.console.debug_command(&output);
        }
        Ok(())
    }

    fn freeze(&self, ctx: &BuildContext<'_>) -> Result<()> {
        let argv = self.command(ctx.log_level)?;
        let Some((program, args)) = argv.split_first() else {
            return Err(Error::CommandNotReady(format!(
                "empty command for target '{}'",
                self.prog
            )));
        };
        ctx.console.debug(&format!("run '{}'", argv.join(" ")));
        let output = ctx.env.run_in(&self.project_root, program, args)?;
        ctx.console.debug_command(&output);
        Ok(())
    }

    /// Directory the `package` mapping copies into
    pub fn package_root(&self) -> Option<PathBuf> {
        let dist = self.dist_path.as_ref()?;
        Some(match self.options.dist_type {
            DistType::OneDir => dist.join(&self.prog),
            DistType::OneFile => dist.clone(),
        })
    }

    fn copy_package_files(&self, ctx: &BuildContext<'_>) -> Result<()> {
        let Some(root) = self.package_root() else {
            return Ok(());
        };
        for (source, destination) in &self.options.package {
            let from = absolutize(&self.project_root, source);
            let relative = if destination == "." { source } else { destination };
            let to = absolutize(&root, relative);
            ctx.console
                .debug(&format!("copy '{}' to '{}'", from.display(), to.display()));
            copy_path(&from, &to)?;
        }
        Ok(())
    }
}

/// Copy a file, or a directory tree replacing any existing destination tree.
/// A file copied onto an existing directory lands inside it.
fn copy_path(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        if to.is_dir() {
            fs::remove_dir_all(to)?;
        }
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| Error::ConfigError(e.to_string()))?;
            let dest = to.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
            } else {
                fs::copy(entry.path(), &dest)?;
            }
        }
    } else {
        let to = match from.file_name() {
            Some(name) if to.is_dir() => to.join(name),
            _ => to.to_path_buf(),
        };
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, &to)?;
    }
    debug!("Copied {:?} to {:?}", from, to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Project;
    use crate::console::{Console, MemorySink, Verbosity};
    use crate::env::{InvocationKind, RecordingEnvironment};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tracing::Level;

    const MANIFEST: &str = r#"
[project]
version = "1.2.0"

[tool.poetry-pyinstaller-plugin.targets.cli]
source = "app/main.py"
type = "onefile"
certifi = { append = ["certs/corp.pem"] }
package = { "assets" = ".", "README.md" = "docs/README.md" }

[tool.poetry-pyinstaller-plugin.targets.tool]
source = "app/main.py"
package = { "README.md" = "_tool_internal" }

[tool.poetry-pyinstaller-plugin.targets.nightly]
source = "app/main.py"
when = "prerelease"
"#;

    struct Fixture {
        _dir: TempDir,
        project: Project,
        sink: Arc<MemorySink>,
        console: Console,
        output: PathBuf,
    }

    fn fixture(verbosity: Verbosity) -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("assets/icons")).unwrap();
        fs::write(root.join("assets/icons/app.png"), b"png").unwrap();
        fs::write(root.join("README.md"), b"# readme").unwrap();
        let project = Project::from_manifest_str(&root, MANIFEST, "manylinux_2_17_x86_64").unwrap();
        let sink = Arc::new(MemorySink::new());
        let console = Console::new(sink.clone(), verbosity);
        let output = root.join("dist");
        Fixture {
            _dir: dir,
            project,
            sink,
            console,
            output,
        }
    }

    #[test]
    fn test_build_runs_steps_in_order() {
        let fx = fixture(Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv");
        let ctx = BuildContext::new(&fx.output, &env, &fx.console, Level::WARN);
        let mut target = Target::new("cli", &fx.project).unwrap();

        assert_eq!(target.build(&ctx).unwrap(), BuildOutcome::Built);

        let invocations = env.invocations();
        assert_eq!(invocations.len(), 3);
        assert_eq!(
            invocations[0].command_line(),
            "poetry install --all-extras --all-groups"
        );
        assert_eq!(invocations[1].kind, InvocationKind::Script);
        assert!(invocations[1].args[0].contains("certs/corp.pem"));
        assert_eq!(invocations[2].program, "pyinstaller");
        assert_eq!(invocations[2].args[1], "--onefile");

        assert_eq!(
            fx.sink.lines(),
            vec![
                "  - Building cli",
                "  - Adding certs/corp.pem to certifi",
                "  - Built cli",
            ]
        );
        assert_eq!(
            target.dist_path(),
            Some(fx.output.join("pyinstaller/manylinux_2_17_x86_64").as_path())
        );
    }

    #[test]
    fn test_build_copies_package_files() {
        let fx = fixture(Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv");
        let ctx = BuildContext::new(&fx.output, &env, &fx.console, Level::WARN);
        let mut target = Target::new("cli", &fx.project).unwrap();
        target.build(&ctx).unwrap();

        let root = target.package_root().unwrap();
        assert!(root.join("assets/icons/app.png").is_file());
        assert_eq!(
            fs::read_to_string(root.join("docs/README.md")).unwrap(),
            "# readme"
        );
    }

    #[test]
    fn test_package_file_into_existing_directory() {
        let fx = fixture(Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv");
        let ctx = BuildContext::new(&fx.output, &env, &fx.console, Level::WARN);
        let mut target = Target::new("tool", &fx.project).unwrap();
        let internal = fx
            .output
            .join("pyinstaller/manylinux_2_17_x86_64/tool/_tool_internal");
        fs::create_dir_all(&internal).unwrap();

        assert_eq!(target.build(&ctx).unwrap(), BuildOutcome::Built);
        assert_eq!(
            fs::read_to_string(internal.join("README.md")).unwrap(),
            "# readme"
        );
    }

    #[test]
    fn test_skipped_target() {
        let fx = fixture(Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv");
        let ctx = BuildContext::new(&fx.output, &env, &fx.console, Level::WARN);
        let mut target = Target::new("nightly", &fx.project).unwrap();

        assert_eq!(target.build(&ctx).unwrap(), BuildOutcome::Skipped);
        assert!(env.invocations().is_empty());
        assert!(fx.sink.contains(" - Skipping nightly (on prerelease only)"));
        assert!(target.dist_path().is_some());
    }

    #[test]
    fn test_debug_echoes_commands() {
        let fx = fixture(Verbosity::Debug);
        let env = RecordingEnvironment::new("/venv").with_output("poetry", "Installing deps\n");
        let ctx = BuildContext::new(&fx.output, &env, &fx.console, Level::DEBUG);
        let mut target = Target::new("cli", &fx.project).unwrap();
        target.build(&ctx).unwrap();

        assert!(fx.sink.contains(
            "[pyinstaller-runner] run 'poetry install --all-extras --all-groups'"
        ));
        assert!(fx.sink.contains("[pyinstaller-runner]  + Installing deps"));
        let pyinstaller = env.invocations_of("pyinstaller");
        assert!(pyinstaller[0].args.contains(&"--debug=all".to_string()));
    }

    #[test]
    fn test_failed_freeze_propagates() {
        let fx = fixture(Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv").failing("pyinstaller");
        let ctx = BuildContext::new(&fx.output, &env, &fx.console, Level::WARN);
        let mut target = Target::new("cli", &fx.project).unwrap();

        let err = target.build(&ctx).unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
        assert!(!fx.sink.contains("  - Built cli"));
    }
}
