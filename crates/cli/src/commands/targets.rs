use anyhow::{Context, Result};
use pyinstaller_runner_core::config::platform;
use pyinstaller_runner_core::{Project, Target, Verbosity};
use std::path::Path;
use tracing::debug;

use super::project_dir;
use crate::display::{TargetSummary, print_target};

/// List targets with the command `build` would run at the same verbosity
pub fn targets_command(
    project: Option<&Path>,
    platform: Option<String>,
    json: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let dir = project_dir(project)?;
    let platform = platform.unwrap_or_else(platform::host);
    debug!("Listing targets of {} for {}", dir.display(), platform);

    let project = Project::load(&dir, platform)
        .with_context(|| format!("Failed to load {}", dir.display()))?;
    let output_root = project.root().join("dist");

    let mut summaries = Vec::new();
    for name in project.target_names()? {
        let mut target = Target::new(&name, &project)
            .with_context(|| format!("Invalid target '{name}'"))?;
        target.set_dist_path(target.dist_path_for(&output_root));
        let command = target.pyinstaller_command(verbosity.log_level())?;
        summaries.push((TargetSummary::new(&target, &command), command));
    }

    if json {
        let items: Vec<&TargetSummary> = summaries.iter().map(|(s, _)| s).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No targets definition found in {}", dir.display());
        return Ok(());
    }

    println!("🔍 Targets for platform {}", project.platform());
    println!("{}", "=".repeat(80));
    for (summary, command) in &summaries {
        print_target(summary, command);
    }
    Ok(())
}
