//! Error types for release configuration and container assembly.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for semrel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while patching configuration or running a release.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The release configuration file could not be read.
    #[error("Failed to read release configuration {}", path.display())]
    #[diagnostic(
        code(semrel::config::read),
        help("Check that the file exists and is readable")
    )]
    ConfigRead {
        /// The path that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The release configuration is not valid JSON.
    #[error("Failed to parse release configuration{}", display_path(path.as_ref()))]
    #[diagnostic(
        code(semrel::config::parse),
        help("The release configuration must be a valid JSON document")
    )]
    ConfigParse {
        /// The file that failed to parse, if it came from disk
        path: Option<PathBuf>,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The release configuration parsed but has an unexpected shape.
    #[error("Invalid release configuration: {message}")]
    #[diagnostic(code(semrel::config::invalid))]
    InvalidConfig {
        /// What is wrong with the document
        message: String,
    },

    /// The patched configuration could not be serialized.
    #[error("Failed to serialize release configuration: {0}")]
    #[diagnostic(code(semrel::config::serialize))]
    Serialize(#[source] serde_json::Error),

    /// The container runtime failed to run a release.
    #[error("Container execution failed: {message}")]
    #[diagnostic(
        code(semrel::runtime::execution),
        help("Check that the container engine is running and the image is reachable")
    )]
    Execution {
        /// The error message
        message: String,
    },
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}

impl Error {
    /// Create a new config read error.
    #[must_use]
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create a new config parse error.
    #[must_use]
    pub fn config_parse(path: Option<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParse { path, source }
    }

    /// Create a new invalid config error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new execution error.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}
