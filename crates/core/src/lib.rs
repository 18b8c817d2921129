//! pyinstaller-runner - Freeze Python entry points into native executables
//!
//! This crate provides functionality to:
//! - Resolve build targets declared in a project's `pyproject.toml`
//! - Synthesize and run PyInstaller commands inside a build environment
//! - Run pre- and post-build hooks around the freeze
//! - Bundle frozen executables into platform-tagged wheels
pub mod build;
pub mod command;
pub mod config;
pub mod console;
pub mod env;
pub mod error;
pub mod hooks;
pub mod target;
pub mod utils;
pub mod wheel;

// Re-export commonly used types and traits
pub use error::{Error, Result};

// Re-export main API components
pub use build::{BuildContext, BuildFormat, BuildOptions, BuildOrchestrator, BuildReport};
pub use command::PyInstallerCommand;
pub use config::{LayeredConfig, PackageVersion, Project};
pub use console::{Console, MemorySink, OutputSink, StdoutSink, Verbosity};
pub use env::{Environment, RecordingEnvironment, VirtualEnv};
pub use hooks::{HookInterface, HookKind, HookRegistry};
pub use target::{BuildOutcome, DistType, Target, TargetOptions, When};
