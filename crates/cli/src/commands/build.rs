use anyhow::{Context, Result};
use pyinstaller_runner_core::config::platform;
use pyinstaller_runner_core::{
    BuildFormat, BuildOptions, BuildOrchestrator, Console, Environment, Project, Verbosity,
    VirtualEnv,
};
use std::path::PathBuf;
use tracing::{debug, info};

use super::project_dir;

#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub project: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<BuildFormat>,
    pub platform: Option<String>,
    pub dry_run: bool,
    pub verbosity: Verbosity,
}

pub fn build_command(args: BuildArgs) -> Result<()> {
    let dir = project_dir(args.project.as_deref())?;
    debug!("Building project in {}", dir.display());

    let initial_platform = args.platform.clone().unwrap_or_else(platform::host);
    let mut project = Project::load(&dir, initial_platform)
        .with_context(|| format!("Failed to load {}", dir.display()))?;

    // The environment is only created when something will actually run in it
    let needs_env = !args.dry_run
        && args.format != Some(BuildFormat::Sdist)
        && !project.target_names()?.is_empty();

    let env = if needs_env {
        VirtualEnv::discover(project.root()).context("Failed to prepare build environment")?
    } else {
        VirtualEnv::open(project.root().join(".venv"))
    };

    if needs_env && args.platform.is_none() {
        let tag = env
            .platform_tag()
            .context("Failed to resolve platform tag from environment")?;
        project.set_platform(tag);
    }

    let console = Console::stdout(args.verbosity);
    let options = BuildOptions {
        output_root: args.output,
        format: args.format,
        verbosity: args.verbosity,
        dry_run: args.dry_run,
    };

    let report = BuildOrchestrator::new(&project, &env, &console, options)
        .run()
        .context("Build failed")?;

    info!(
        "built={:?} skipped={:?} wheels={:?}",
        report.built, report.skipped, report.wheels
    );
    Ok(())
}
