use std::io;

/// Errors that can occur during pyinstaller-runner operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Error while retrieving pyproject.toml data.")]
    ManifestUnavailable,

    #[error("Failed to parse pyproject.toml: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("Hook resolution error: {0}")]
    HookResolution(String),

    #[error("Command '{command}' failed ({status}):\n{output}")]
    ToolFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("Command not ready: {0}")]
    CommandNotReady(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid wheel: {0}")]
    InvalidWheel(String),

    #[error("Wheel archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for pyinstaller-runner operations
pub type Result<T> = std::result::Result<T, Error>;
