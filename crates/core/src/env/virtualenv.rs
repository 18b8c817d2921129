use super::{Environment, display_command, to_args};
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A Python virtual environment on disk
#[derive(Debug, Clone)]
pub struct VirtualEnv {
    path: PathBuf,
}

impl VirtualEnv {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a fresh environment with `python -m venv`
    pub fn create(path: impl Into<PathBuf>, python: &str) -> Result<Self> {
        let path = path.into();
        let args = vec![
            "-m".to_string(),
            "venv".to_string(),
            path.to_string_lossy().into_owned(),
        ];
        debug!("Creating virtual environment at {:?}", path);
        run_captured(Command::new(python).args(&args), &display_command(python, &args))?;
        Ok(Self::open(path))
    }

    /// The active environment (`VIRTUAL_ENV`), then `<root>/.venv`,
    /// creating the latter when neither exists.
    pub fn discover(project_root: &Path) -> Result<Self> {
        if let Some(active) = std::env::var_os("VIRTUAL_ENV") {
            debug!("Using active virtual environment {:?}", active);
            return Ok(Self::open(PathBuf::from(active)));
        }

        let local = project_root.join(".venv");
        if local.join("pyvenv.cfg").exists() {
            return Ok(Self::open(local));
        }

        let python = if cfg!(windows) { "python" } else { "python3" };
        Self::create(local, python)
    }

    pub fn python(&self) -> PathBuf {
        let exe = if cfg!(windows) { "python.exe" } else { "python" };
        self.script_dir().join(exe)
    }

    /// Prefer the environment's own executable over one found on `PATH`
    fn resolve_program(&self, program: &str) -> PathBuf {
        let dir = self.script_dir();
        let candidates = if cfg!(windows) {
            vec![dir.join(format!("{program}.exe")), dir.join(program)]
        } else {
            vec![dir.join(program)]
        };
        candidates
            .into_iter()
            .find(|c| c.exists())
            .unwrap_or_else(|| PathBuf::from(program))
    }

    fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> Command {
        let mut cmd = Command::new(program);
        let mut path_var = OsString::from(self.script_dir());
        if let Some(existing) = std::env::var_os("PATH") {
            path_var.push(if cfg!(windows) { ";" } else { ":" });
            path_var.push(existing);
        }
        cmd.env("VIRTUAL_ENV", &self.path).env("PATH", path_var);
        cmd
    }
}

impl Environment for VirtualEnv {
    fn path(&self) -> &Path {
        &self.path
    }

    fn script_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.path.join("Scripts")
        } else {
            self.path.join("bin")
        }
    }

    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let resolved = self.resolve_program(program);
        let mut cmd = self.command(&resolved);
        cmd.args(args);
        run_captured(&mut cmd, &display_command(program, args))
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[String]) -> Result<String> {
        let resolved = self.resolve_program(program);
        let mut cmd = self.command(&resolved);
        cmd.args(args).current_dir(dir);
        run_captured(&mut cmd, &display_command(program, args))
    }

    fn run_script(&self, source: &str) -> Result<String> {
        let mut cmd = self.command(self.python());
        cmd.arg("-c").arg(source);
        run_captured(&mut cmd, "python -c <script>")
    }

    fn run_pip(&self, args: &[String]) -> Result<String> {
        let mut full = to_args(&["-m", "pip"]);
        full.extend(args.iter().cloned());
        let mut cmd = self.command(self.python());
        cmd.args(&full);
        run_captured(&mut cmd, &display_command("pip", args))
    }
}

/// Run to completion, returning stdout followed by stderr
fn run_captured(cmd: &mut Command, shown: &str) -> Result<String> {
    debug!("Executing: {}", shown);
    let output = cmd.output()?;
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(Error::ToolFailed {
            command: shown.to_string(),
            status: output.status.to_string(),
            output: combined,
        });
    }
    Ok(combined)
}
