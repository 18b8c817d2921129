use pyinstaller_runner_core::{DistType, PyInstallerCommand, Target, When};
use serde::Serialize;

use super::print_command_breakdown;

/// Serializable view of a resolved target
#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub prog: String,
    pub source: String,
    #[serde(rename = "type")]
    pub dist_type: DistType,
    pub bundle: bool,
    pub when: When,
    pub skipped: bool,
    pub version: String,
    pub command: Vec<String>,
}

impl TargetSummary {
    pub fn new(target: &Target, command: &PyInstallerCommand) -> Self {
        let options = target.options();
        Self {
            prog: target.prog().to_string(),
            source: target.source().display().to_string(),
            dist_type: options.dist_type,
            bundle: options.bundle,
            when: options.when,
            skipped: target.skip(),
            version: target.package_version().to_string(),
            command: command.argv(),
        }
    }

    /// e.g. `onefile, bundled, release only`
    pub fn describe(&self) -> String {
        let mut parts = vec![self.dist_type.to_string()];
        if self.bundle {
            parts.push("bundled".to_string());
        }
        if let Some(when) = self.when.as_str() {
            parts.push(format!("{when} only"));
        }
        parts.join(", ")
    }
}

pub fn print_target(summary: &TargetSummary, command: &PyInstallerCommand) {
    println!("\n🎯 {}", summary.prog);
    println!("   📦 Type: {}", summary.describe());
    println!("   🏷️  Version: {}", summary.version);
    if summary.skipped {
        println!("   ⏭️  Skipped for this version");
    }
    print_command_breakdown(command);
    println!("   ▶️  {}", command.to_shell_command());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyinstaller_runner_core::Project;
    use tracing::Level;

    #[test]
    fn test_summary() {
        let manifest = r#"
[project]
version = "2.0.0rc1"
[tool.poetry-pyinstaller-plugin.targets]
cli = { source = "main.py", type = "onefile", bundle = true, when = "release" }
"#;
        let project = Project::from_manifest_str("/proj", manifest, "linux_x86_64").unwrap();
        let mut target = Target::new("cli", &project).unwrap();
        target.set_dist_path("/proj/dist/pyinstaller/linux_x86_64");
        let command = target.pyinstaller_command(Level::WARN).unwrap();

        let summary = TargetSummary::new(&target, &command);
        assert!(summary.skipped);
        assert_eq!(summary.describe(), "onefile, bundled, release only");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "onefile");
        assert_eq!(json["when"], "release");
        assert_eq!(json["command"][0], "pyinstaller");
    }
}
