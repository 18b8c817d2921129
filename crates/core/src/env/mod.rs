//! Build environment collaborator
//!
//! The build only needs a narrow surface from the Python environment it
//! freezes in: run a program, run a Python script, and drive pip.

mod recording;
mod virtualenv;

pub use recording::{Invocation, InvocationKind, RecordingEnvironment};
pub use virtualenv::VirtualEnv;

use crate::config::platform;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Script printing the most specific interpreter tag
const SYS_TAG_SCRIPT: &str = r#"
try:
    from packaging import tags
except ImportError:
    from pip._vendor.packaging import tags
print(next(iter(tags.sys_tags())))
"#;

const PYTHON_VERSION_SCRIPT: &str = "import sys; print('%d.%d' % sys.version_info[:2])";

/// Core trait for environments the freezing tool runs in
pub trait Environment: Send + Sync {
    /// Root directory of the environment
    fn path(&self) -> &Path;

    /// Directory holding the environment's executables
    fn script_dir(&self) -> PathBuf;

    /// Run `program` inside the environment, returning captured output
    fn run(&self, program: &str, args: &[String]) -> Result<String>;

    /// Like [`Environment::run`], with `dir` as the working directory
    fn run_in(&self, dir: &Path, program: &str, args: &[String]) -> Result<String> {
        let _ = dir;
        self.run(program, args)
    }

    /// Run Python source with the environment's interpreter
    fn run_script(&self, source: &str) -> Result<String>;

    /// Run `pip` with the environment's interpreter
    fn run_pip(&self, args: &[String]) -> Result<String>;

    fn python_version(&self) -> Result<(u32, u32)> {
        let output = self.run_script(PYTHON_VERSION_SCRIPT)?;
        parse_python_version(&output)
    }

    /// Platform segment of the interpreter's most specific wheel tag
    fn platform_tag(&self) -> Result<String> {
        let output = self.run_script(SYS_TAG_SCRIPT)?;
        Ok(platform::from_sys_tag(&output)
            .map(str::to_string)
            .unwrap_or_else(platform::host))
    }
}

/// Parse the `major.minor` reply of [`PYTHON_VERSION_SCRIPT`]
fn parse_python_version(output: &str) -> Result<(u32, u32)> {
    let reply = output.trim();
    let invalid = || Error::ConfigError(format!("Unexpected Python version output: '{reply}'"));
    let (major, minor) = reply.split_once('.').ok_or_else(invalid)?;
    Ok((
        major.parse().map_err(|_| invalid())?,
        minor.parse().map_err(|_| invalid())?,
    ))
}

/// Own a list of string literals as command arguments
pub fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Render a command line for log messages
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut cmd = program.to_string();
    for arg in args {
        cmd.push(' ');
        cmd.push_str(arg);
    }
    cmd
}
