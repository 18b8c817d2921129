use super::HookKind;
use crate::config::Project;
use crate::console::Console;
use crate::env::{Environment, display_command, to_args};
use crate::error::Result;

/// What a running hook may do: print, run commands and drive pip in the
/// build environment.
pub struct HookInterface<'a> {
    kind: HookKind,
    name: &'a str,
    console: &'a Console,
    env: &'a dyn Environment,
    project: &'a Project,
}

impl<'a> HookInterface<'a> {
    pub fn new(
        kind: HookKind,
        name: &'a str,
        console: &'a Console,
        env: &'a dyn Environment,
        project: &'a Project,
    ) -> Self {
        Self {
            kind,
            name,
            console,
            env,
            project,
        }
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn platform(&self) -> &str {
        self.project.platform()
    }

    pub fn project(&self) -> &Project {
        self.project
    }

    pub fn env(&self) -> &dyn Environment {
        self.env
    }

    pub fn console(&self) -> &Console {
        self.console
    }

    pub fn write_line(&self, msg: &str) {
        self.console.log(msg);
    }

    /// Run `command` in the build environment, from the project root
    pub fn run(&self, command: &str, args: &[&str]) -> Result<String> {
        let args = to_args(args);
        self.console
            .debug(&format!("Running '{}'", display_command(command, &args)));
        let output = self.env.run_in(self.project.root(), command, &args)?;
        self.echo(&output);
        Ok(output)
    }

    pub fn run_pip(&self, args: &[&str]) -> Result<String> {
        let args = to_args(args);
        self.console
            .debug(&format!("Running '{}'", display_command("pip", &args)));
        let output = self.env.run_pip(&args)?;
        self.echo(&output);
        Ok(output)
    }

    fn echo(&self, output: &str) {
        for line in output.lines() {
            self.console.debug(&format!("++ {line}"));
        }
    }
}
