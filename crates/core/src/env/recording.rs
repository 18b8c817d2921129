use super::Environment;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    Run,
    Script,
    Pip,
}

/// One recorded call into the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: InvocationKind,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn command_line(&self) -> String {
        super::display_command(&self.program, &self.args)
    }
}

type Handler = Box<dyn Fn(&[String]) -> Result<String> + Send + Sync>;

/// An environment that records invocations instead of spawning processes.
///
/// Programs answer with canned output, a custom handler, or a failure.
#[derive(Default)]
pub struct RecordingEnvironment {
    path: PathBuf,
    invocations: Mutex<Vec<Invocation>>,
    outputs: HashMap<String, String>,
    handlers: HashMap<String, Handler>,
    failing: Vec<String>,
}

impl RecordingEnvironment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Canned output for `program` (`python` for scripts, `pip` for pip)
    pub fn with_output(mut self, program: &str, output: &str) -> Self {
        self.outputs.insert(program.to_string(), output.to_string());
        self
    }

    pub fn with_handler(
        mut self,
        program: &str,
        handler: impl Fn(&[String]) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(program.to_string(), Box::new(handler));
        self
    }

    /// Make every invocation of `program` exit non-zero
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().map(|i| i.clone()).unwrap_or_default()
    }

    pub fn invocations_of(&self, program: &str) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.program == program)
            .collect()
    }

    fn record(&self, kind: InvocationKind, program: &str, args: &[String]) -> Result<String> {
        if let Ok(mut invocations) = self.invocations.lock() {
            invocations.push(Invocation {
                kind,
                program: program.to_string(),
                args: args.to_vec(),
            });
        }

        if self.failing.iter().any(|p| p == program) {
            return Err(Error::ToolFailed {
                command: super::display_command(program, args),
                status: "exit status: 1".to_string(),
                output: String::new(),
            });
        }

        if let Some(handler) = self.handlers.get(program) {
            return handler(args);
        }

        Ok(self.outputs.get(program).cloned().unwrap_or_default())
    }
}

impl Environment for RecordingEnvironment {
    fn path(&self) -> &Path {
        &self.path
    }

    fn script_dir(&self) -> PathBuf {
        self.path.join("bin")
    }

    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        self.record(InvocationKind::Run, program, args)
    }

    fn run_script(&self, source: &str) -> Result<String> {
        self.record(InvocationKind::Script, "python", &[source.to_string()])
    }

    fn run_pip(&self, args: &[String]) -> Result<String> {
        self.record(InvocationKind::Pip, "pip", args)
    }
}
