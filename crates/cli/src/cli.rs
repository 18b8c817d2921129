use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use pyinstaller_runner_core::{BuildFormat, Verbosity};
use std::path::PathBuf;

use crate::commands::{BuildArgs, build_command, show_command, targets_command};

#[derive(Parser, Debug)]
#[command(name = "pyinstaller-runner")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Runner {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity (-v progress details, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Runner {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_occurrences(self.verbose)
    }

    pub fn execute(self) -> Result<()> {
        let verbosity = self.verbosity();
        self.command.execute(verbosity)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Freeze every declared target and bundle them into wheels
    #[command(visible_alias = "b")]
    Build {
        /// Project directory containing pyproject.toml
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Output directory (defaults to <project>/dist)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Restrict the build like `poetry build --format`
        #[arg(short, long)]
        format: Option<BuildFormat>,

        /// Override the platform tag used for paths and wheel names
        #[arg(long)]
        platform: Option<String>,

        /// Print the commands without executing them
        #[arg(short, long)]
        dry_run: bool,
    },
    /// List declared targets with their resolved options
    #[command(visible_alias = "t")]
    Targets {
        /// Project directory containing pyproject.toml
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Override the platform tag
        #[arg(long)]
        platform: Option<String>,

        /// Print targets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the pyinstaller-runner version
    Show,
}

impl Commands {
    /// Execute the command
    pub fn execute(self, verbosity: Verbosity) -> Result<()> {
        match self {
            Commands::Build {
                project,
                output,
                format,
                platform,
                dry_run,
            } => build_command(BuildArgs {
                project,
                output,
                format,
                platform,
                dry_run,
                verbosity,
            }),
            Commands::Targets {
                project,
                platform,
                json,
            } => targets_command(project.as_deref(), platform, json, verbosity),
            Commands::Show => show_command(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Runner::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let runner = Runner::parse_from([
            "pyinstaller-runner",
            "build",
            "--format",
            "pyinstaller",
            "--dry-run",
            "-vv",
        ]);
        assert_eq!(runner.verbosity(), Verbosity::Debug);
        match runner.command {
            Commands::Build {
                format, dry_run, ..
            } => {
                assert_eq!(format, Some(BuildFormat::PyInstaller));
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = Runner::try_parse_from(["pyinstaller-runner", "build", "--format", "exe"]);
        assert!(result.is_err());
    }
}
