//! Freezing-tool command synthesis

mod pyinstaller_builder;
mod pyinstaller_command;

pub use pyinstaller_builder::PyInstallerCommandBuilder;
pub use pyinstaller_command::PyInstallerCommand;
