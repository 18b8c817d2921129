use super::{HookFn, HookInterface, HookKind, HookRegistry};
use crate::config::Project;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Printed by the shim instead of running when the callable is absent
const MISSING_CALLABLE: &str = "::pyinstaller-runner::missing-callable";

const SHIM_TEMPLATE: &str = r#"
import importlib.util
import os
import subprocess
import sys

os.chdir(__ROOT__)
sys.path.insert(0, __ROOT__)

spec = importlib.util.spec_from_file_location(__TOP__, __PATH__)
module = importlib.util.module_from_spec(spec)
spec.loader.exec_module(module)

if not hasattr(module, __CALLABLE__):
    print(__MARKER__)
    sys.exit(0)


class HookInterface:
    platform = __PLATFORM__

    def write_line(self, msg):
        print(msg, flush=True)

    def run(self, command, *args):
        return subprocess.run([command, *args], check=True, capture_output=True, text=True).stdout

    def run_pip(self, *args):
        return self.run(sys.executable, "-m", "pip", *args)


getattr(module, __CALLABLE__)(HookInterface())
"#;

#[derive(Clone)]
enum HookSource {
    Native(HookFn),
    Script(PathBuf),
}

/// A resolved lifecycle hook
#[derive(Clone)]
pub struct PluginHook {
    kind: HookKind,
    name: String,
    module: String,
    callable: String,
    source: HookSource,
}

impl std::fmt::Debug for PluginHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            HookSource::Native(_) => "native".to_string(),
            HookSource::Script(path) => path.display().to_string(),
        };
        f.debug_struct("PluginHook")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("source", &source)
            .finish()
    }
}

impl PluginHook {
    /// Resolve `<module>:<callable>`, registry first, then the project tree.
    ///
    /// A module that cannot be found is a [`Error::HookResolution`].
    pub fn resolve(
        kind: HookKind,
        name: &str,
        project: &Project,
        registry: &HookRegistry,
    ) -> Result<Self> {
        let (module, callable) = name.split_once(':').ok_or_else(|| {
            Error::ConfigError(format!(
                "Invalid {kind}-build hook '{name}', expected '<module>:<callable>'"
            ))
        })?;

        let source = match registry.get(name) {
            Some(hook) => HookSource::Native(hook),
            None => HookSource::Script(find_module(module, &project.base_module_paths()?)?),
        };

        Ok(Self {
            kind,
            name: name.to_string(),
            module: module.to_string(),
            callable: callable.to_string(),
            source,
        })
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module file backing a script hook
    pub fn script_path(&self) -> Option<&Path> {
        match &self.source {
            HookSource::Script(path) => Some(path),
            HookSource::Native(_) => None,
        }
    }

    pub fn exec(&self, interface: &HookInterface<'_>) -> Result<()> {
        match &self.source {
            HookSource::Native(hook) => {
                self.announce(interface);
                hook(interface)
            }
            HookSource::Script(path) => self.exec_script(path, interface),
        }
    }

    fn announce(&self, interface: &HookInterface<'_>) {
        interface.write_line(&format!("Running {}-build hook '{}'", self.kind, self.name));
    }

    fn exec_script(&self, path: &Path, interface: &HookInterface<'_>) -> Result<()> {
        let script = self.shim(path, interface)?;
        debug!("Executing {}-build hook shim for {:?}", self.kind, path);
        let output = interface.env().run_script(&script)?;

        if output.lines().any(|line| line == MISSING_CALLABLE) {
            interface.console().warning(&format!(
                "Skipping {}-build hook, '{}' callable not found in {}.",
                self.kind, self.callable, self.module
            ));
            return Ok(());
        }

        self.announce(interface);
        for line in output.lines() {
            interface.write_line(line);
        }
        Ok(())
    }

    fn shim(&self, path: &Path, interface: &HookInterface<'_>) -> Result<String> {
        let top = self.module.rsplit('.').next().unwrap_or(&self.module);
        Ok(SHIM_TEMPLATE
            .replace("__ROOT__", &py_literal(&interface.project().root().to_string_lossy())?)
            .replace("__TOP__", &py_literal(top)?)
            .replace("__PATH__", &py_literal(&path.to_string_lossy())?)
            .replace("__CALLABLE__", &py_literal(&self.callable)?)
            .replace("__MARKER__", &py_literal(MISSING_CALLABLE)?)
            .replace("__PLATFORM__", &py_literal(interface.platform())?))
    }
}

/// JSON string literals are valid Python string literals
fn py_literal(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// `a.b.c` is looked up as `<base>/a/b/c.py` under each base path in turn
fn find_module(module: &str, bases: &[PathBuf]) -> Result<PathBuf> {
    let mut relative: PathBuf = module.split('.').collect();
    relative.set_extension("py");

    bases
        .iter()
        .map(|base| base.join(&relative))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            Error::HookResolution(format!("Unable to find module '{module}' in current project."))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Console, MemorySink, Verbosity};
    use crate::env::{InvocationKind, RecordingEnvironment};
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn project_with_hooks() -> (TempDir, Project) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/hooks")).unwrap();
        fs::write(
            dir.path().join("src/hooks/build.py"),
            "def pre_build(interface):\n    interface.write_line('hello')\n",
        )
        .unwrap();
        let project = Project::from_manifest_str(dir.path(), "", "linux_x86_64").unwrap();
        (dir, project)
    }

    #[test]
    fn test_resolve_from_src_tree() {
        let (dir, project) = project_with_hooks();
        let hook =
            PluginHook::resolve(HookKind::Pre, "hooks.build:pre_build", &project, &HookRegistry::new())
                .unwrap();
        assert_eq!(
            hook.script_path(),
            Some(dir.path().join("src/hooks/build.py").as_path())
        );
    }

    #[test]
    fn test_missing_module() {
        let (_dir, project) = project_with_hooks();
        let err = PluginHook::resolve(HookKind::Post, "nowhere.mod:post", &project, &HookRegistry::new())
            .unwrap_err();
        assert!(matches!(err, Error::HookResolution(_)));
        assert!(err.to_string().contains("Unable to find module 'nowhere.mod' in current project."));
    }

    #[test]
    fn test_malformed_name() {
        let (_dir, project) = project_with_hooks();
        let err = PluginHook::resolve(HookKind::Pre, "hooks.build", &project, &HookRegistry::new())
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_registry_wins() {
        let (_dir, project) = project_with_hooks();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let registry = HookRegistry::new().with_hook("virtual.module:pre", move |hook| {
            seen.lock().unwrap().push(hook.platform().to_string());
            hook.write_line("native hook ran");
            Ok(())
        });

        let hook = PluginHook::resolve(HookKind::Pre, "virtual.module:pre", &project, &registry).unwrap();
        assert!(hook.script_path().is_none());

        let sink = Arc::new(MemorySink::new());
        let console = Console::new(sink.clone(), Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv");
        let interface = HookInterface::new(HookKind::Pre, hook.name(), &console, &env, &project);
        hook.exec(&interface).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["linux_x86_64"]);
        assert_eq!(
            sink.lines(),
            vec!["Running pre-build hook 'virtual.module:pre'", "native hook ran"]
        );
        assert!(env.invocations().is_empty());
    }

    #[test]
    fn test_script_hook_forwards_output() {
        let (_dir, project) = project_with_hooks();
        let hook =
            PluginHook::resolve(HookKind::Pre, "hooks.build:pre_build", &project, &HookRegistry::new())
                .unwrap();
        let sink = Arc::new(MemorySink::new());
        let console = Console::new(sink.clone(), Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv").with_output("python", "hello\n");
        let interface = HookInterface::new(HookKind::Pre, hook.name(), &console, &env, &project);

        hook.exec(&interface).unwrap();

        let scripts = env.invocations();
        assert_eq!(scripts[0].kind, InvocationKind::Script);
        assert!(scripts[0].args[0].contains("\"pre_build\""));
        assert!(scripts[0].args[0].contains("build.py"));
        assert_eq!(
            sink.lines(),
            vec!["Running pre-build hook 'hooks.build:pre_build'", "hello"]
        );
    }

    #[test]
    fn test_script_hook_missing_callable_is_skipped() {
        let (_dir, project) = project_with_hooks();
        let hook =
            PluginHook::resolve(HookKind::Post, "hooks.build:post_build", &project, &HookRegistry::new())
                .unwrap();
        let sink = Arc::new(MemorySink::new());
        let console = Console::new(sink.clone(), Verbosity::Normal);
        let env = RecordingEnvironment::new("/venv").with_output("python", &format!("{MISSING_CALLABLE}\n"));
        let interface = HookInterface::new(HookKind::Post, hook.name(), &console, &env, &project);

        hook.exec(&interface).unwrap();
        assert_eq!(
            sink.lines(),
            vec!["Skipping post-build hook, 'post_build' callable not found in hooks.build."]
        );
    }
}
